//! Demonstrates generating the production jump polynomials and checking one
//! against direct stepping.

use jump_gen::{render_artifact, Generator, GeneratorConfig, PackedPoly};
use xorwow_core::{advance, step, State, XorwowParams};

fn main() {
    let generator = Generator::new(GeneratorConfig::default()).expect("production config");
    let artifact = generator.generate().expect("production tables");
    print!("{}", render_artifact(&artifact));

    // jump[3] advances by 4^3 = 64 steps.
    let params = XorwowParams::production();
    let seed = State::from_words(&params, &[123456789, 362436069, 521288629, 88675123, 5783321])
        .expect("seed words fit 32 bits");
    let table = artifact.table("jump").expect("jump table");
    let entry: &PackedPoly = match &table.entries {
        jump_gen::JumpEntries::Poly(entries) => &entries[3],
        jump_gen::JumpEntries::Matrix(_) => unreachable!("default tables are polynomials"),
    };

    let mut jumped = State::zero(&params);
    let mut current = seed.clone();
    for k in 0..params.state_bits() {
        if entry.coeff(k) {
            jumped.xor_assign(&current);
        }
        step(&params, &mut current);
    }
    assert_eq!(jumped, advance(&params, &seed, 64));

    eprintln!("example succeeded; jump[3] matches 64 direct steps");
}
