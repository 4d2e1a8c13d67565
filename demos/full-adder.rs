use matcirc::{
    circuit::Circuit,
    gates,
    render::{ self, RenderConfig },
    state,
};
use tracing_subscriber::{ prelude::*, EnvFilter };

// reversible one-bit full adder
//
// inputs a, b, and carry-in on q_0, q_1, q_2; q_3 starts in ∣0⟩
// on output, q_2 holds the sum and q_3 holds the carry-out
fn full_adder() -> anyhow::Result<Circuit> {
    let mut circuit = Circuit::new(4)?;
    circuit.add_component(gates::toffoli(3, 0, 1)?)?;
    circuit.add_component(gates::cx(0, 1)?)?;
    circuit.add_component(gates::toffoli(3, 1, 2)?)?;
    circuit.add_component(gates::cx(1, 2)?)?;
    circuit.add_component(gates::cx(0, 1)?)?;
    Ok(circuit)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "matcirc=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = RenderConfig::compact();
    let circuit = full_adder()?;
    println!("{}", render::circuit(&circuit, &config));

    println!("input states -> output states");
    for (bits, output) in circuit.truth_table()? {
        if bits[3] != 0 { continue; }
        let (a, b, cin) = (bits[0], bits[1], bits[2]);
        let sum = a ^ b ^ cin;
        let carry = (a & b) | (cin & (a ^ b));
        let expected = state::register_ket(&[a, b, sum, carry])?;
        println!(
            "a={a} b={b} cin={cin}: {} -> {} {}",
            render::state(&state::register_ket(&bits)?, &config),
            render::state(&output, &config),
            if output == expected { "ok" } else { "MISMATCH" },
        );
    }
    Ok(())
}
