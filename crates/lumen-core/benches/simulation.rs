//! Benchmarks for circuit simulation
//!
//! Tests performance of chain reduction, global solves and time sweeps.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lumen_core::prelude::*;
use lumen_core::reduction::ChainReducer;

const WL: f64 = 1550e-9;

fn source() -> Laser {
    let light = CoherentLight::from_polar(1.0, 0.0, 0.5, 0.3, WL).unwrap();
    Laser::constant(light, Coherence::Coherent)
}

/// A run of `n` lossy birefringent waveguides with a wave plate every few sections
fn create_waveguide_run(n: usize) -> Circuit {
    let mut circuit = Circuit::new("run");
    for i in 0..n {
        let name = format!("e{}", i);
        let component = if i % 4 == 3 {
            Component::new(name, HalfWavePlate::new(0.1 * i as f64))
        } else {
            Component::new(
                name,
                PhaseShifter::waveguide(2.4, 2.35, 20e-6).with_loss(100.0, 150.0),
            )
        };
        circuit.add(component).unwrap();
    }
    for i in 1..n {
        circuit
            .connect((format!("e{}", i - 1), 1), (format!("e{}", i), 0))
            .unwrap();
    }
    circuit.set_input(("e0", 0), source()).unwrap();
    circuit.set_output((format!("e{}", n - 1), 1)).unwrap();
    circuit
}

/// A cascade of `n` Mach-Zehnder stages built from splitters and phase shifters
fn create_mzi_cascade(n: usize) -> Circuit {
    let mut circuit = Circuit::new("cascade");
    circuit.add(Component::new("bs0", BeamSplitter)).unwrap();
    for k in 0..n {
        let upper = format!("ps{}", k);
        let next = format!("bs{}", k + 1);
        let phase = 0.3 * (k + 1) as f64;
        circuit
            .add(Component::new(upper.as_str(), PhaseShifter::ideal(phase).with_modulation(|t| t)))
            .unwrap();
        circuit.add(Component::new(next.as_str(), BeamSplitter)).unwrap();
        circuit.connect((format!("bs{}", k), 2), (upper.as_str(), 0)).unwrap();
        circuit.connect((upper.as_str(), 1), (next.as_str(), 0)).unwrap();
        circuit.connect((format!("bs{}", k), 3), (next.as_str(), 1)).unwrap();
    }
    circuit.set_input(("bs0", 0), source()).unwrap();
    circuit.set_output((format!("bs{}", n), 2)).unwrap();
    circuit.set_output((format!("bs{}", n), 3)).unwrap();
    circuit
}

fn bench_chain_reduction(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain_reduction");

    for n in [4, 16, 64].iter() {
        let circuit = create_waveguide_run(*n);
        let reducer = ChainReducer::default();
        group.bench_with_input(BenchmarkId::new("reduce", n), n, |b, _| {
            b.iter(|| black_box(reducer.reduce(&circuit).unwrap()))
        });
    }

    group.finish();
}

fn bench_waveguide_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("waveguide_run");

    for n in [4, 16, 64].iter() {
        let circuit = create_waveguide_run(*n);
        for reduce in [true, false] {
            let options = SimulationOptions::default().with_reduce_chains(reduce);
            let id = BenchmarkId::new(if reduce { "reduced" } else { "full" }, n);
            group.bench_with_input(id, n, |b, _| {
                b.iter(|| {
                    black_box(
                        Simulation::with_options(&circuit, options.clone())
                            .simulate(&[0.0])
                            .unwrap(),
                    )
                })
            });
        }
    }

    group.finish();
}

fn bench_time_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("time_sweep");

    for stages in [2, 8].iter() {
        let circuit = create_mzi_cascade(*stages);
        for samples in [16, 256].iter() {
            let times: Vec<f64> = (0..*samples).map(|i| i as f64 * 0.01).collect();
            for parallel in [true, false] {
                let options = SimulationOptions::default().with_parallel(parallel);
                let label = if parallel { "parallel" } else { "sequential" };
                let id = BenchmarkId::new(format!("{}stages_{}", stages, label), samples);
                group.bench_with_input(id, samples, |b, _| {
                    b.iter(|| {
                        black_box(
                            Simulation::with_options(&circuit, options.clone())
                                .simulate(&times)
                                .unwrap(),
                        )
                    })
                });
            }
        }
    }

    group.finish();
}

fn bench_s_parameters(c: &mut Criterion) {
    let mut group = c.benchmark_group("s_parameters");

    for nwl in [10, 100].iter() {
        let circuit = create_mzi_cascade(4);
        let wavelengths: Vec<f64> = (0..*nwl).map(|i| 1500e-9 + i as f64 * 1e-10).collect();
        group.bench_with_input(BenchmarkId::new("mzi_cascade", nwl), nwl, |b, _| {
            b.iter(|| black_box(Simulation::new(&circuit).s_parameters(&wavelengths).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_chain_reduction,
    bench_waveguide_run,
    bench_time_sweep,
    bench_s_parameters,
);
criterion_main!(benches);
