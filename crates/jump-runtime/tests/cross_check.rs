//! Production tables: matrices and polynomials must move states identically.

use std::sync::OnceLock;

use jump_gen::{Generator, GeneratorConfig, JumpKind};
use jump_runtime::JumpRuntime;
use num_bigint::BigUint;
use proptest::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use xorwow_core::{advance, State, XorwowParams};

fn runtime(kind: JumpKind) -> JumpRuntime {
    let config = GeneratorConfig {
        kind,
        ..GeneratorConfig::default()
    };
    let generator = Generator::new(config).expect("production config is valid");
    JumpRuntime::new(generator.generate().expect("production tables"))
}

fn random_state<R: Rng>(rng: &mut R) -> State {
    let params = XorwowParams::production();
    let words: Vec<u32> = (0..params.words).map(|_| rng.gen()).collect();
    State::from_words(&params, &words).unwrap()
}

#[test]
fn every_production_entry_agrees() {
    let matrices = runtime(JumpKind::Matrix);
    let polys = runtime(JumpKind::Poly);
    let mut rng = ChaCha20Rng::from_seed([80u8; 32]);
    for name in ["jump", "jump_subsequence"] {
        let m = matrices.table(name).unwrap();
        let p = polys.table(name).unwrap();
        assert_eq!(m.len(), 32);
        assert_eq!(p.len(), 32);
        for index in 0..32 {
            assert_eq!(m.distance(index), p.distance(index));
            let state = random_state(&mut rng);
            assert_eq!(
                m.apply_entry(index, &state).unwrap(),
                p.apply_entry(index, &state).unwrap(),
                "{name}[{index}]"
            );
        }
    }
}

#[test]
fn first_entries_match_direct_stepping() {
    let params = XorwowParams::production();
    let mut rng = ChaCha20Rng::from_seed([81u8; 32]);
    for kind in [JumpKind::Matrix, JumpKind::Poly] {
        let rt = runtime(kind);
        let table = rt.table("jump").unwrap();
        for index in 0..7 {
            let steps = 4u64.pow(index as u32);
            let state = random_state(&mut rng);
            assert_eq!(
                table.apply_entry(index, &state).unwrap(),
                advance(&params, &state, steps),
                "{kind} jump[{index}]"
            );
        }
    }
}

#[test]
fn subsequence_entries_compose() {
    // jump_subsequence[1] = 4 * 2^67 steps = jump_subsequence[0] applied four times.
    let rt = runtime(JumpKind::Poly);
    let table = rt.table("jump_subsequence").unwrap();
    let mut rng = ChaCha20Rng::from_seed([82u8; 32]);
    let state = random_state(&mut rng);
    let mut stepped = state.clone();
    for _ in 0..4 {
        stepped = table.apply_entry(0, &stepped).unwrap();
    }
    assert_eq!(table.apply_entry(1, &state).unwrap(), stepped);
    assert_eq!(table.distance(1), BigUint::from(1u8) << 69);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn discard_matches_stepping(count in 0u64..20_000, seed in any::<[u8; 32]>()) {
        let params = XorwowParams::production();
        static POLYS: OnceLock<JumpRuntime> = OnceLock::new();
        let rt = POLYS.get_or_init(|| runtime(JumpKind::Poly));
        let table = rt.table("jump").unwrap();
        let state = random_state(&mut ChaCha20Rng::from_seed(seed));
        prop_assert_eq!(
            table.advance(&state, &BigUint::from(count)).unwrap(),
            advance(&params, &state, count)
        );
    }
}
