use matcirc::{ circuit::Circuit, gates, render::{ self, RenderConfig } };
use tracing_subscriber::{ prelude::*, EnvFilter };

// prepare the Bell state (∣00⟩ + ∣11⟩) / √2
//
// q_0 ---H---*---
//            |
// q_1 -------X---
//
fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "matcirc=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = RenderConfig::default();
    let mut circuit = Circuit::new(2)?;
    circuit.add_component(gates::h(0))?;
    circuit.add_component(gates::cx(0, 1)?)?;
    circuit.set_input_register(&[0, 0])?;

    println!("{}", render::circuit(&circuit, &config));
    println!("{}", render::probabilities(&circuit, &config)?);
    println!("final state = {}", render::state(&circuit.get_final_state()?, &config));
    println!("circuit matrix =\n{:.3}", circuit.get_matrix()?);
    Ok(())
}
