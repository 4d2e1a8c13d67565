use std::time::Instant;
use matcirc::{
    circuit::Circuit,
    gates,
    phase::Phase,
    render::{ self, RenderConfig },
};
use tracing_subscriber::{ prelude::*, EnvFilter };

fn timeit<F, T>(mut f: F) -> (T, f64)
where F: FnMut() -> T
{
    let t0 = Instant::now();
    let out: T = f();
    (out, (Instant::now() - t0).as_secs_f64())
}

// quantum Fourier transform on `n` registers, followed by the bit-reversal
// swaps
fn qft(n: usize) -> anyhow::Result<Circuit> {
    let mut circuit = Circuit::new(n)?;
    for j in 0..n {
        for k in 0..j {
            let theta = Phase::pi() / (1_i64 << (j - k));
            circuit.add_component(gates::cp(j, k, theta)?)?;
        }
        circuit.add_component(gates::h(j))?;
    }
    for i in 0..n / 2 {
        circuit.add_component(gates::swap(i, n - i - 1)?)?;
    }
    Ok(circuit)
}

fn main() -> anyhow::Result<()> {
    const N: usize = 3;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "matcirc=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = RenderConfig::default();
    let mut circuit = qft(N)?;
    println!("{}", render::circuit(&circuit, &config));

    print!("compute circuit matrix ... ");
    let (matrix, t) = timeit(|| circuit.get_matrix());
    println!("{:.3e} secs", t);
    println!("unitary: {}", matrix?.is_unitary());

    // the transform of ∣001⟩ is a uniform superposition with linearly
    // increasing phases
    circuit.set_input_register(&[1, 0, 0])?;
    println!("{}", render::probabilities(&circuit, &config)?);
    println!("final state = {}", render::state(&circuit.get_final_state()?, &config));
    Ok(())
}
