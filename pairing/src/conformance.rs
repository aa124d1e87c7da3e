//! Property checks shared by every [Suite].
//!
//! Each check exercises one algebraic contract against a suite and returns a [Failure] describing
//! the first property that does not hold. Checks draw all randomness from the provided stream and
//! record the pseudo-random values they produce (as encoded bytes), so two suites run from the same
//! stream label can be compared byte for byte.

use crate::{
    algebra::{divide, invert, Additive, Field, Group, PrimeOrder, SubgroupCheck},
    bls::{self, Scheme, Variant},
    codec::{ByteOrder, Marshal},
    stream::Stream,
    tbls::{self, generate_shares, poly::Eval, poly::Poly, Threshold},
    Error, Suite,
};
use rand::{CryptoRng, Rng, RngCore};
use tracing::debug;

/// Number of pseudo-random elements sampled by [check_group].
const PICKS: usize = 5;

/// Number of concurrent workers used by [check_concurrent_pairing].
pub const WORKERS: usize = 10;

/// A property that does not hold for a suite.
#[derive(thiserror::Error, Debug)]
pub enum Failure {
    #[error("{context}: {property}")]
    Property {
        context: String,
        property: &'static str,
    },
    #[error("{context}: {operation} failed: {source}")]
    Operation {
        context: String,
        operation: &'static str,
        #[source]
        source: Error,
    },
}

fn ensure(condition: bool, context: &str, property: &'static str) -> Result<(), Failure> {
    if condition {
        return Ok(());
    }
    debug!(context, property, "conformance check failed");
    Err(Failure::Property {
        context: context.to_string(),
        property,
    })
}

fn operation<T, E: Into<Error>>(
    result: Result<T, E>,
    context: &str,
    operation: &'static str,
) -> Result<T, Failure> {
    result.map_err(|err| Failure::Operation {
        context: context.to_string(),
        operation,
        source: err.into(),
    })
}

/// Checks scalar field arithmetic and encoding, returning the encodings of the sampled scalars.
pub fn check_scalar<F, R>(context: &str, rng: &mut R) -> Result<Vec<Vec<u8>>, Failure>
where
    F: Field,
    R: RngCore + CryptoRng,
{
    let mut log = Vec::new();

    // A scalar times its inverse encodes the multiplicative identity
    let s = F::pick(rng);
    let inv = operation(s.inverse().ok_or(Error::NoInverse), context, "inversion")?;
    let neutral = (s.clone() * &inv).marshal_binary();
    ensure(neutral.len() == F::SIZE, context, "scalar length")?;
    let marker = match F::BYTE_ORDER {
        ByteOrder::BigEndian => neutral[F::SIZE - 1],
        ByteOrder::LittleEndian => neutral[0],
    };
    ensure(marker == 1, context, "one encodes at the declared byte order")?;
    ensure(
        neutral.iter().map(|b| *b as u32).sum::<u32>() == 1,
        context,
        "one has a single set bit",
    )?;
    log.push(s.marshal_binary());

    // Distinct draws
    let a = F::pick(rng);
    let b = F::pick(rng);
    ensure(!a.is_zero() && !b.is_zero(), context, "picked scalars are non-zero")?;
    ensure(a != b, context, "picked scalars are unique")?;

    // Field identities
    ensure(a.clone() + &F::zero() == a, context, "zero is the additive identity")?;
    ensure(a.clone() * &F::one() == a, context, "one is the multiplicative identity")?;
    ensure((-b.clone()) + &a == a.clone() - &b, context, "negation agrees with subtraction")?;
    ensure(
        F::from_i64(-1) == -F::one(),
        context,
        "from_i64 maps -1 to the negation of one",
    )?;
    let quotient = operation(a.div(&b).ok_or(Error::NoInverse), context, "division")?;
    ensure(quotient * &b == a, context, "division inverts multiplication")?;
    ensure(F::zero().inverse().is_none(), context, "zero has no inverse")?;

    // Round trips
    for _ in 0..PICKS {
        let s = F::pick(rng);
        let bytes = s.marshal_binary();
        let decoded = operation(F::unmarshal_binary(&bytes), context, "scalar decoding")?;
        ensure(decoded == s, context, "scalar encoding round-trips")?;
        log.push(bytes);
    }
    Ok(log)
}

/// Checks the group contract, returning the encodings of the elements produced along the way.
pub fn check_group<G, R>(context: &str, rng: &mut R) -> Result<Vec<Vec<u8>>, Failure>
where
    G: Group + SubgroupCheck + PrimeOrder,
    R: RngCore + CryptoRng,
{
    let mut log = Vec::new();
    let zero = G::zero();
    let one = G::Scalar::one();
    let gen = G::generator();
    log.push(gen.marshal_binary());

    // Diffie-Hellman secrets
    let s1 = G::Scalar::pick(rng);
    let s2 = G::Scalar::pick(rng);
    ensure(s1 != s2, context, "picked scalars are unique")?;

    // Addition and multiplication agree
    let two = G::Scalar::from_i64(2);
    let doubled = gen.clone() + &gen;
    ensure(doubled == G::mul_base(&two), context, "doubling equals scaling by two")?;
    let quadrupled = doubled.clone() + &doubled;
    ensure(
        quadrupled == G::mul_base(&G::Scalar::from_i64(4)),
        context,
        "quadrupling equals scaling by four",
    )?;
    log.push(quadrupled.marshal_binary());

    // Identities of the generator
    let minus_one = G::Scalar::from_i64(-1);
    ensure(
        G::mul_base(&minus_one) + &gen == zero,
        context,
        "generator additive identity",
    )?;
    if G::is_prime_order() {
        let half = operation(invert::<G>(&two), context, "inversion")?;
        ensure(
            G::mul_base(&two) * &half == gen,
            context,
            "generator multiplicative identity",
        )?;
    }

    let p1 = G::mul_base(&s1);
    let p2 = G::mul_base(&s2);
    ensure(p1 != p2, context, "distinct secrets give distinct points")?;
    log.push(p1.marshal_binary());

    let dh1 = p1.clone() * &s2;
    let dh2 = p2.clone() * &s1;
    ensure(dh1 == dh2, context, "Diffie-Hellman agreement")?;
    log.push(dh1.marshal_binary());

    if G::is_prime_order() {
        let inv = operation(invert::<G>(&s2), context, "inversion")?;
        ensure(dh1.clone() * &inv == p1, context, "scalar inverse undoes scaling")?;
    }

    ensure(
        dh1.clone() * &G::Scalar::zero() == zero,
        context,
        "scaling by zero gives the identity",
    )?;
    ensure(dh1.clone() * &one == dh1, context, "scaling by one is the identity map")?;
    ensure(zero.clone() + &dh1 == dh1, context, "identity is neutral")?;
    ensure(-zero.clone() == zero, context, "identity is its own negation")?;

    // Additive homomorphism
    let sum = p1.clone() + &p2;
    ensure(
        G::mul_base(&(s1.clone() + &s2)) == sum,
        context,
        "additive homomorphism (sum)",
    )?;
    let difference = p1.clone() - &p2;
    ensure(
        G::mul_base(&(s1.clone() - &s2)) == difference,
        context,
        "additive homomorphism (difference)",
    )?;
    ensure(
        (-s2.clone()) + &s1 == s1.clone() - &s2,
        context,
        "scalar negation agrees with subtraction",
    )?;
    ensure(
        (-p2.clone()) + &p1 == difference,
        context,
        "point negation agrees with subtraction",
    )?;

    // Multiplicative homomorphism
    let product = s1.clone() * &s2;
    ensure(
        G::mul_base(&product) == dh1,
        context,
        "multiplicative homomorphism",
    )?;
    if G::is_prime_order() {
        let quotient = operation(divide::<G>(&product, &s2), context, "division")?;
        ensure(quotient == s1, context, "scalar division")?;
    }

    // Pseudo-random elements
    let mut last = gen.clone();
    for _ in 0..PICKS {
        let picked = G::pick(rng);
        ensure(picked != last, context, "picked points are unique")?;
        ensure(
            picked.clone() * &minus_one + &picked == zero,
            context,
            "picked point additive identity",
        )?;
        if G::is_prime_order() {
            let half = operation(invert::<G>(&two), context, "inversion")?;
            ensure(
                picked.clone() * &two * &half == picked,
                context,
                "picked point multiplicative identity",
            )?;
        }
        ensure(
            picked.is_in_correct_group(),
            context,
            "picked point is in the subgroup",
        )?;
        log.push(picked.marshal_binary());
        last = picked;
    }

    // Encoding round trips, including the identity
    for _ in 0..PICKS {
        let picked = G::pick(rng);
        let bytes = picked.marshal_binary();
        ensure(bytes.len() == G::SIZE, context, "point length")?;
        let decoded = operation(G::unmarshal_binary(&bytes), context, "point decoding")?;
        ensure(decoded == picked, context, "point encoding round-trips")?;
    }
    let bytes = zero.marshal_binary();
    let decoded = operation(G::unmarshal_binary(&bytes), context, "identity decoding")?;
    ensure(decoded.is_zero(), context, "identity round-trips")?;
    ensure(
        zero.is_in_correct_group(),
        context,
        "identity is in the subgroup",
    )?;
    Ok(log)
}

/// Checks bilinearity and the multi-pairing check, returning the encodings of the computed
/// pairings.
pub fn check_pairing<S, R>(suite: &S, rng: &mut R) -> Result<Vec<Vec<u8>>, Failure>
where
    S: Suite,
    R: RngCore + CryptoRng,
{
    let context = suite.name();
    let mut log = Vec::new();
    let g = S::G1::generator();
    let h = S::G2::generator();

    // e(aG, bH) = e(abG, H)
    let a = S::Scalar::pick(rng);
    let b = S::Scalar::pick(rng);
    let ag = S::G1::mul_base(&a);
    let bh = S::G2::mul_base(&b);
    let ab = a.clone() * &b;
    let abg = S::G1::mul_base(&ab);
    let left = suite.pair(&ag, &bh);
    ensure(left == suite.pair(&abg, &h), context, "bilinearity")?;
    ensure(
        left == S::Gt::generator() * &ab,
        context,
        "pairing is exponentiation of the generator",
    )?;
    ensure(
        suite.validate_pairing(&ag, &bh, &abg, &h),
        context,
        "pairing check accepts equal pairings",
    )?;
    log.push(left.marshal_binary());

    // Unrelated points pair differently
    let other = suite.pair(&ag, &S::G2::pick(rng));
    ensure(left != other, context, "pairing with a random G2 point differs")?;
    ensure(
        !suite.validate_pairing(&ag, &bh, &ag, &h),
        context,
        "pairing check rejects unequal pairings",
    )?;
    let other = suite.pair(&S::G1::pick(rng), &bh);
    ensure(left != other, context, "pairing with a random G1 point differs")?;
    log.push(other.marshal_binary());

    // ab = c + d, checked in the exponent
    let c = S::Scalar::pick(rng);
    let d = ab.clone() - &c;
    let right = suite.pair(&S::G1::mul_base(&c), &h) + &suite.pair(&g, &S::G2::mul_base(&d));
    ensure(left == right, context, "target group addition")?;
    ensure(
        -right.clone() + &right == S::Gt::zero(),
        context,
        "target group negation",
    )?;
    ensure(
        right.clone() - &right == S::Gt::zero(),
        context,
        "target group subtraction",
    )?;

    // e(aG, H) = e(G, H)^a = e(G, aH)
    let base = suite.pair(&g, &h);
    ensure(base == S::Gt::generator(), context, "target group generator")?;
    let scaled = base * &a;
    ensure(
        suite.pair(&ag, &h) == scaled,
        context,
        "target group scaling in G1",
    )?;
    ensure(
        suite.pair(&g, &S::G2::mul_base(&a)) == scaled,
        context,
        "target group scaling in G2",
    )?;

    // The identity pairs to the identity
    ensure(
        suite.pair(&S::G1::zero(), &h).is_zero() && suite.pair(&g, &S::G2::zero()).is_zero(),
        context,
        "pairing with the identity",
    )?;
    Ok(log)
}

/// Runs [WORKERS] concurrent pairing checks against shared read-only points.
pub fn check_concurrent_pairing<S, R>(suite: &S, rng: &mut R) -> Result<(), Failure>
where
    S: Suite,
    R: RngCore + CryptoRng,
{
    let context = suite.name();
    let a = S::Scalar::pick(rng);
    let ag = S::G1::mul_base(&a);
    let b = S::G2::pick(rng);
    let ab = b.clone() * &a;
    let g = S::G1::generator();

    // e(aG, B) = e(G, aB)
    let results = std::thread::scope(|scope| {
        let handles = (0..WORKERS)
            .map(|_| scope.spawn(|| suite.validate_pairing(&ag, &b, &g, &ab)))
            .collect::<Vec<_>>();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or(false))
            .collect::<Vec<_>>()
    });
    ensure(
        results.iter().all(|ok| *ok),
        context,
        "concurrent pairing checks agree",
    )
}

/// Checks the signature scheme, returning the produced signatures.
pub fn check_scheme<S: Suite, V: Variant<S>, R: RngCore + CryptoRng>(
    suite: &S,
    rng: &mut R,
) -> Result<Vec<Vec<u8>>, Failure> {
    let context = suite.name();
    let scheme = Scheme::<S, V>::new(*suite, bls::Config::default());
    let mut log = Vec::new();

    // Sign and verify
    let mut message = [0u8; 32];
    rng.fill_bytes(&mut message);
    let (private, public) = scheme.new_keypair(rng);
    let signature = scheme.sign(&private, &message);
    operation(scheme.verify(&public, &message, &signature), context, "verification")?;
    ensure(
        matches!(
            scheme.verify(&public, b"wrong message", &signature),
            Err(Error::InvalidSignature)
        ),
        context,
        "signature over another message is rejected",
    )?;
    for i in 0..signature.len() {
        let mut corrupted = signature.clone();
        corrupted[i] ^= 0x01;
        ensure(
            scheme.verify(&public, &message, &corrupted).is_err(),
            context,
            "corrupted signature is rejected",
        )?;
    }
    log.push(signature);

    // Aggregation of 10 signatures over the same message
    let keypairs = (0..10).map(|_| scheme.new_keypair(rng)).collect::<Vec<_>>();
    let publics = keypairs.iter().map(|(_, public)| public.clone()).collect::<Vec<_>>();
    let mut signatures = keypairs
        .iter()
        .map(|(private, _)| scheme.sign(private, &message))
        .collect::<Vec<_>>();
    let aggregate = operation(scheme.aggregate_signatures(&signatures), context, "aggregation")?;
    let aggregate_public = scheme.aggregate_public_keys(&publics);
    operation(
        scheme.verify(&aggregate_public, &message, &aggregate),
        context,
        "aggregate verification",
    )?;
    log.push(aggregate);

    let index = rng.gen_range(0..signatures.len());
    signatures[index] = scheme.sign(&keypairs[index].0, b"different message");
    let corrupted = operation(scheme.aggregate_signatures(&signatures), context, "aggregation")?;
    ensure(
        scheme.aggregate_verify(&publics, &message, &corrupted).is_err(),
        context,
        "aggregate with a corrupted signature is rejected",
    )?;
    Ok(log)
}

/// Checks threshold signing with `t` of `n` shares, returning the combined signature.
pub fn check_threshold<S: Suite, V: Variant<S>, R: RngCore + CryptoRng>(
    suite: &S,
    rng: &mut R,
    n: u32,
    t: u32,
) -> Result<Vec<u8>, Failure> {
    let context = suite.name();
    let threshold = operation(
        Threshold::new(
            Scheme::<S, V>::new(*suite, bls::Config::default()),
            tbls::Config {
                threshold: t,
                concurrency: 1,
            },
        ),
        context,
        "threshold scheme",
    )?;
    let (public, shares) = operation(
        generate_shares::<V::Public, _>(rng, n, t),
        context,
        "dealing",
    )?;
    ensure(
        shares
            .iter()
            .all(|share| share.public::<V::Public>() == public.evaluate(share.index).value),
        context,
        "shares match the commitment",
    )?;

    let mut message = [0u8; 32];
    rng.fill_bytes(&mut message);
    let partials = shares
        .iter()
        .map(|share| threshold.partial_sign(share, &message))
        .collect::<Vec<_>>();
    for partial in &partials {
        operation(
            threshold.verify_partial_poly(&public, &message, partial),
            context,
            "partial verification",
        )?;
    }

    // The secret only serves as a reference here
    let evals = shares
        .iter()
        .map(|share| Eval {
            index: share.index,
            value: share.private.clone(),
        })
        .collect::<Vec<_>>();
    let secret = operation(Poly::recover(t, &evals), context, "secret recovery")?;
    let expected = threshold.scheme().sign(&secret, &message);

    // Every window of `t` partials combines to the same signature
    for window in partials.windows(t as usize) {
        let signature = operation(
            threshold.combine(&public, &message, window),
            context,
            "combination",
        )?;
        ensure(
            signature.marshal_binary() == expected,
            context,
            "combined signature equals the signature of the secret",
        )?;
    }
    operation(
        threshold
            .scheme()
            .verify(public.constant(), &message, &expected),
        context,
        "threshold verification",
    )?;

    ensure(
        matches!(
            threshold.combine(&public, &message, &partials[..t as usize - 1]),
            Err(Error::InsufficientShares { .. })
        ),
        context,
        "too few partials are rejected",
    )?;
    Ok(expected)
}

/// Encodings recorded while checking a suite.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Samples {
    pub scalars: Vec<Vec<u8>>,
    pub g1: Vec<Vec<u8>>,
    pub g2: Vec<Vec<u8>>,
    pub gt: Vec<Vec<u8>>,
    pub pairings: Vec<Vec<u8>>,
    pub signatures: Vec<Vec<u8>>,
}

/// Runs every check against `suite` with a stream keyed by `label`.
pub fn run<S: Suite>(suite: &S, label: &[u8]) -> Result<Samples, Failure> {
    let mut rng = Stream::new(label);
    let name = suite.name();
    let mut samples = Samples {
        scalars: check_scalar::<S::Scalar, _>(name, &mut rng)?,
        g1: check_group::<S::G1, _>(&format!("{name}/G1"), &mut rng)?,
        g2: check_group::<S::G2, _>(&format!("{name}/G2"), &mut rng)?,
        gt: check_group::<S::Gt, _>(&format!("{name}/GT"), &mut rng)?,
        pairings: check_pairing(suite, &mut rng)?,
        signatures: Vec::new(),
    };
    check_concurrent_pairing(suite, &mut rng)?;
    samples
        .signatures
        .extend(check_scheme::<S, bls::MinPk, _>(suite, &mut rng)?);
    samples
        .signatures
        .extend(check_scheme::<S, bls::MinSig, _>(suite, &mut rng)?);
    samples
        .signatures
        .push(check_threshold::<S, bls::MinPk, _>(suite, &mut rng, 7, 4)?);
    samples
        .signatures
        .push(check_threshold::<S, bls::MinSig, _>(suite, &mut rng, 7, 4)?);
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        bls12381::{arkworks::Arkworks, blst::Blst, G1_LENGTH, G2_LENGTH},
        codec,
    };

    #[test]
    fn test_scalar_endianness() {
        let blst = check_scalar::<<Blst as Suite>::Scalar, _>(
            "blst",
            &mut Stream::new(b"TestScalarEndianess"),
        )
        .unwrap();
        let arkworks = check_scalar::<<Arkworks as Suite>::Scalar, _>(
            "arkworks",
            &mut Stream::new(b"TestScalarEndianess"),
        )
        .unwrap();
        assert_eq!(blst, arkworks);
    }

    #[test]
    fn test_suites_agree() {
        let blst = run(&Blst, b"conformance").unwrap();
        let arkworks = run(&Arkworks, b"conformance").unwrap();
        assert_eq!(blst.scalars, arkworks.scalars);
        assert_eq!(blst.g1, arkworks.g1);
        assert_eq!(blst.g2, arkworks.g2);
        assert_eq!(blst.signatures, arkworks.signatures);
        assert_eq!(blst.gt, arkworks.gt);
        assert_eq!(blst.pairings, arkworks.pairings);
        assert_eq!(blst, arkworks);
    }

    #[test]
    fn test_run_is_deterministic() {
        assert_eq!(
            run(&Blst, b"deterministic").unwrap(),
            run(&Blst, b"deterministic").unwrap()
        );
    }

    #[test]
    fn test_concurrent_pairing() {
        check_concurrent_pairing(&Blst, &mut Blst.random_stream()).unwrap();
        check_concurrent_pairing(&Arkworks, &mut Arkworks.random_stream()).unwrap();
    }

    #[test]
    fn test_entropy() {
        // Suites also run from operating-system randomness
        let mut rng = Blst.random_stream();
        check_group::<<Blst as Suite>::G1, _>("blst/G1", &mut rng).unwrap();
        let mut rng = Arkworks.random_stream();
        check_group::<<Arkworks as Suite>::G2, _>("arkworks/G2", &mut rng).unwrap();
    }

    /// Returns the first encoding (varying the low bytes of x) that is on the curve but outside
    /// the prime-order subgroup, along with an encoding that is not on the curve at all.
    fn outside_subgroup<G: SubgroupCheck>(len: usize) -> (Vec<u8>, Vec<u8>) {
        let mut outside = None;
        let mut off_curve = None;
        for i in 1..=u16::MAX {
            let mut bytes = vec![0u8; len];
            bytes[0] = 0x80;
            bytes[len - 2..].copy_from_slice(&i.to_be_bytes());
            match G::unmarshal_unchecked(&bytes) {
                Ok(point) if !point.is_in_correct_group() => {
                    outside.get_or_insert(bytes);
                }
                Ok(_) => {}
                Err(codec::Error::NotOnCurve) => {
                    off_curve.get_or_insert(bytes);
                }
                Err(err) => panic!("unexpected error: {err}"),
            }
            if outside.is_some() && off_curve.is_some() {
                break;
            }
        }
        (outside.unwrap(), off_curve.unwrap())
    }

    fn subgroup_detection<S: Suite>() {
        let (outside, off_curve) = outside_subgroup::<S::G1>(G1_LENGTH);
        assert_eq!(
            S::G1::unmarshal_binary(&outside),
            Err(codec::Error::NotInSubgroup)
        );
        assert_eq!(
            S::G1::unmarshal_binary(&off_curve),
            Err(codec::Error::NotOnCurve)
        );

        let (outside, off_curve) = outside_subgroup::<S::G2>(G2_LENGTH);
        assert_eq!(
            S::G2::unmarshal_binary(&outside),
            Err(codec::Error::NotInSubgroup)
        );
        assert_eq!(
            S::G2::unmarshal_binary(&off_curve),
            Err(codec::Error::NotOnCurve)
        );

        // Sampled points are always in the subgroup
        let mut rng = Stream::new(b"subgroup");
        assert!(S::G1::pick(&mut rng).is_in_correct_group());
        assert!(S::G2::pick(&mut rng).is_in_correct_group());
    }

    #[test]
    fn test_subgroup_detection() {
        subgroup_detection::<Blst>();
        subgroup_detection::<Arkworks>();
    }

    #[test]
    fn test_backends_reject_the_same_points() {
        let (outside, off_curve) = outside_subgroup::<<Blst as Suite>::G1>(G1_LENGTH);
        assert_eq!(
            outside_subgroup::<<Arkworks as Suite>::G1>(G1_LENGTH),
            (outside, off_curve)
        );
        let (outside, off_curve) = outside_subgroup::<<Blst as Suite>::G2>(G2_LENGTH);
        assert_eq!(
            outside_subgroup::<<Arkworks as Suite>::G2>(G2_LENGTH),
            (outside, off_curve)
        );
    }

    #[test]
    fn test_failure_display() {
        let failure = ensure(false, "blst/G1", "identity is neutral").unwrap_err();
        assert_eq!(failure.to_string(), "blst/G1: identity is neutral");
    }
}
