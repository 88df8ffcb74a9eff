use esirkepov_rs::{Config, Params, Setup, Sim};

pub fn setup_sim() -> Sim {
    // This is a function that sets up a dummy small
    // simulation so that it can be used in testing.
    let cfg = Config {
        setup: Setup { t_final: 2 },
        params: Params {
            size_x: 16,
            size_y: 16,
            size_z: 16,
            delta: 3,
            c: 0.5,
            dens: 2,
            vth: 1e-3,
        },
    };
    Sim::new(&cfg).expect("test config should validate")
}
