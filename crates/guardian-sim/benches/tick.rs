use criterion::{black_box, criterion_group, criterion_main, Criterion};
use guardian_sim::{Autopilot, Difficulty, SimConfig, Simulation};

fn bench_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("session");
    for difficulty in [Difficulty::Normal, Difficulty::Hard] {
        let config = SimConfig::default().with_seed(17).with_difficulty(difficulty);
        group.bench_function(format!("{difficulty:?}/300_ticks"), |b| {
            b.iter(|| {
                let Ok(mut sim) = Simulation::new(config.clone()) else {
                    return;
                };
                let mut pilot = Autopilot::default();
                for _ in 0..300 {
                    black_box(sim.step_autopilot(&mut pilot));
                }
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_session);
criterion_main!(benches);
