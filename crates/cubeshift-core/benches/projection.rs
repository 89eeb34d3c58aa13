use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use cubeshift_core::prelude::*;
use image::{Rgba, RgbaImage};
use std::hint::black_box;

fn generate_faces(face_size: u32) -> FaceSet {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    FaceSet::from_fn(|_| {
        RgbaImage::from_fn(face_size, face_size, |_, _| {
            Rgba([rng.gen_range(0..=255), rng.gen_range(0..=255), rng.gen_range(0..=255), 255])
        })
    })
    .expect("faces")
}

fn bench_to_equirect(c: &mut Criterion) {
    let mut group = c.benchmark_group("to_equirectangular");

    for face_size in [64u32, 128, 256] {
        let faces = generate_faces(face_size);
        let cfg = ConvertConfig::default();
        let (w, h) = cfg.equirect_size(face_size).expect("size");
        group.throughput(Throughput::Elements(w as u64 * h as u64));

        group.bench_with_input(BenchmarkId::new("serial", face_size), &faces, |b, faces| {
            b.iter(|| black_box(cubeshift_core::to_equirectangular_with(faces, face_size, &cfg)))
        });

        #[cfg(feature = "parallel")]
        {
            let par = ConvertConfig::builder().parallel(true).build();
            group.bench_with_input(BenchmarkId::new("parallel", face_size), &faces, |b, faces| {
                b.iter(|| black_box(cubeshift_core::to_equirectangular_with(faces, face_size, &par)))
            });
        }
    }

    group.finish();
}

fn bench_from_equirect(c: &mut Criterion) {
    let mut group = c.benchmark_group("from_equirectangular");

    for face_size in [64u32, 128, 256] {
        let pano = to_equirectangular(&generate_faces(face_size), face_size).expect("pano");
        group.throughput(Throughput::Elements(6 * face_size as u64 * face_size as u64));

        for sampling in [EquirectSampling::Nearest, EquirectSampling::Bicubic] {
            let cfg = ConvertConfig::builder().equirect_sampling(sampling).build();
            group.bench_with_input(
                BenchmarkId::new(format!("{sampling:?}"), face_size),
                &pano,
                |b, pano| b.iter(|| black_box(cubeshift_core::from_equirectangular_with(pano, face_size, &cfg))),
            );
        }
    }

    group.finish();
}

fn bench_grid_layouts(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_layouts");
    let faces = generate_faces(256);

    for layout in CubeLayout::GRIDS {
        group.bench_with_input(BenchmarkId::new("compose", layout), &faces, |b, faces| {
            b.iter(|| black_box(compose_layout(faces, layout, 256)))
        });
    }

    let packed = compose_layout(&faces, CubeLayout::HorizontalCross, 256).expect("compose");
    let info = detect_format(packed.width() as i64, packed.height() as i64).expect("detect");
    group.bench_function("extract_horizontal_cross", |b| {
        b.iter(|| black_box(extract_faces(&packed, &info)))
    });

    group.finish();
}

criterion_group!(benches, bench_to_equirect, bench_from_equirect, bench_grid_layouts);
criterion_main!(benches);
