use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use campus_bus_tracker::global_variables::NEARBY_RADIUS;
use campus_bus_tracker::network::TransitNetwork;
use campus_bus_tracker::positioning::{nearby_buses, Point};
use campus_bus_tracker::simulation_engine::vehicles::{spawn_route_buses, SimulatedBus};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn bench_nearby_buses(c: &mut Criterion) {
    let network = TransitNetwork::builtin().unwrap();
    let area = network.area("jntu-hyderabad").unwrap();
    let user = Point::new(75.0, 30.0);
    let mut rng = StdRng::seed_from_u64(11);

    let mut group = c.benchmark_group("nearby_buses");

    // Repeating the area's routes grows the fleet without leaving the map.
    for &copies in &[1, 10, 100] {
        let fleet: Vec<SimulatedBus> = (0..copies)
            .flat_map(|_| area.route_ids())
            .flat_map(|route_id| spawn_route_buses(&route_id, &mut rng))
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(fleet.len()), &fleet, |b, fleet| {
            b.iter(|| black_box(nearby_buses(fleet, area, user, NEARBY_RADIUS)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_nearby_buses);
criterion_main!(benches);
