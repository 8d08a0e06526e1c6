use criterion::{
    black_box, criterion_group, criterion_main, AxisScale, BenchmarkId, Criterion,
    PlotConfiguration,
};
use campus_bus_tracker::global_variables::BUS_SPEED;
use campus_bus_tracker::simulation_engine::vehicles::{spawn_route_buses, SimulatedBus};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn build_fleet(routes: usize) -> Vec<SimulatedBus> {
    let mut rng = StdRng::seed_from_u64(7);
    (0..routes)
        .flat_map(|n| spawn_route_buses(&format!("{}K", n), &mut rng))
        .collect()
}

fn bench_tick_fleet(c: &mut Criterion) {
    let route_counts = [3, 30, 300];

    let mut group = c.benchmark_group("tick_fleet");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &routes in &route_counts {
        let fleet = build_fleet(routes);
        group.bench_with_input(BenchmarkId::from_parameter(routes), &fleet, |b, fleet| {
            let mut buses = fleet.clone();
            b.iter(|| {
                for bus in buses.iter_mut() {
                    bus.advance(BUS_SPEED);
                }
                black_box(&buses);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_tick_fleet);
criterion_main!(benches);
