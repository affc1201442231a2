use archmage::SimdToken;
use bitmap_bridge::{BitmapFormat, OwnedBitmap, PixelBuffer, SizeError};
use criterion::{BenchmarkGroup, Criterion, Throughput, measurement::WallTime};

// === SIMD tier detection ===

fn print_simd_info() {
    eprintln!("=== SIMD Tier Detection ===");
    #[cfg(target_arch = "x86_64")]
    {
        let v3 = if archmage::X64V3Token::summon().is_some() {
            "available"
        } else {
            "not available"
        };
        eprintln!("  AVX2+FMA (x86-64-v3):    {v3}");
    }
    eprintln!("  Scalar:                  always available");
    eprintln!("===========================");
}

fn disable_all_simd() {
    let _ = archmage::dangerously_disable_tokens_except_wasm(true);
}

fn enable_all_simd() {
    let _ = archmage::dangerously_disable_tokens_except_wasm(false);
}

// === Naive baselines ===

fn naive_premultiply(src: &[u8], dst: &mut [u8]) {
    for (s, d) in src.chunks_exact(4).zip(dst.chunks_exact_mut(4)) {
        let a = s[3] as f32 / 255.0;
        d[0] = (s[0] as f32 * a).round() as u8;
        d[1] = (s[1] as f32 * a).round() as u8;
        d[2] = (s[2] as f32 * a).round() as u8;
        d[3] = s[3];
    }
}

fn naive_unpremultiply(src: &[u8], dst: &mut [u8]) {
    for (s, d) in src.chunks_exact(4).zip(dst.chunks_exact_mut(4)) {
        let a = s[3] as f32;
        for c in 0..3 {
            d[c] = if a == 0.0 {
                0
            } else {
                (s[c] as f32 * 255.0 / a).round().min(255.0) as u8
            };
        }
        d[3] = s[3];
    }
}

fn naive_565_to_rgba(src: &[u8], dst: &mut [u8]) {
    for (s, d) in src.chunks_exact(2).zip(dst.chunks_exact_mut(4)) {
        let v = u16::from_ne_bytes([s[0], s[1]]);
        d[0] = ((v >> 11) << 3) as u8;
        d[1] = (((v >> 5) & 0x3F) << 2) as u8;
        d[2] = ((v & 0x1F) << 3) as u8;
        d[3] = 255;
    }
}

fn naive_rgba_to_565(src: &[u8], dst: &mut [u8]) {
    for (s, d) in src.chunks_exact(4).zip(dst.chunks_exact_mut(2)) {
        let v = (((s[0] as u16) >> 3) << 11) | (((s[1] as u16) >> 2) << 5) | ((s[2] as u16) >> 3);
        d.copy_from_slice(&v.to_ne_bytes());
    }
}

fn naive_rgba_to_gray(src: &[u8], dst: &mut [u8]) {
    for (s, d) in src.chunks_exact(4).zip(dst.iter_mut()) {
        *d = (0.299 * s[0] as f32 + 0.587 * s[1] as f32 + 0.114 * s[2] as f32).round() as u8;
    }
}

// === Benchmark helpers ===

const W: usize = 1920;
const H: usize = 1080;

fn pattern(n: usize) -> Vec<u8> {
    (0..n).map(|i| (i % 251) as u8).collect()
}

/// Dispatched kernel, scalar-only kernel, naive loop.
fn bench_copy(
    group: &mut BenchmarkGroup<WallTime>,
    kernel: fn(&[u8], &mut [u8]) -> Result<(), SizeError>,
    naive_fn: fn(&[u8], &mut [u8]),
    src: &[u8],
    dst_len: usize,
) {
    group.bench_function("kernel", |b| {
        let mut dst = vec![0u8; dst_len];
        b.iter(|| kernel(src, &mut dst).unwrap());
    });
    disable_all_simd();
    group.bench_function("kernel_scalar", |b| {
        let mut dst = vec![0u8; dst_len];
        b.iter(|| kernel(src, &mut dst).unwrap());
    });
    enable_all_simd();
    group.bench_function("naive", |b| {
        let mut dst = vec![0u8; dst_len];
        b.iter(|| naive_fn(src, &mut dst));
    });
}

fn bench_kernel(
    c: &mut Criterion,
    name: &str,
    (src_bpp, dst_bpp): (usize, usize),
    kernel: fn(&[u8], &mut [u8]) -> Result<(), SizeError>,
    naive_fn: fn(&[u8], &mut [u8]),
) {
    let mut group = c.benchmark_group(name);
    let n = W * H * src_bpp;
    group.throughput(Throughput::Bytes(n as u64));
    let src = pattern(n);
    bench_copy(&mut group, kernel, naive_fn, &src, W * H * dst_bpp);
    group.finish();
}

// === Whole-bitmap marshalling ===

fn bench_import(c: &mut Criterion) {
    let mut group = c.benchmark_group("import_1080p");
    group.throughput(Throughput::Elements((W * H) as u64));
    for (name, format, unpremultiply) in [
        ("rgba", BitmapFormat::Rgba8888, false),
        ("rgba_unpremultiply", BitmapFormat::Rgba8888, true),
        ("rgb565", BitmapFormat::Rgb565, false),
    ] {
        let stride = (W * format.bytes_per_pixel()) as u32;
        let data = pattern(stride as usize * H);
        let mut bitmap = OwnedBitmap::from_bytes(W as u32, H as u32, stride, format, data).unwrap();
        group.bench_function(name, |b| {
            b.iter(|| bitmap_bridge::bitmap_to_buffer(&mut bitmap, unpremultiply).unwrap());
        });
    }
    group.finish();
}

fn bench_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("export_1080p");
    group.throughput(Throughput::Elements((W * H) as u64));
    for (name, channels, format, premultiply) in [
        ("rgba", 4, BitmapFormat::Rgba8888, false),
        ("rgba_premultiply", 4, BitmapFormat::Rgba8888, true),
        ("rgb_to_rgba", 3, BitmapFormat::Rgba8888, false),
        ("rgba_to_rgb565", 4, BitmapFormat::Rgb565, false),
    ] {
        let buffer = PixelBuffer::from_vec(W, H, channels, pattern(W * H * channels)).unwrap();
        let mut bitmap = OwnedBitmap::new(W as u32, H as u32, format).unwrap();
        group.bench_function(name, |b| {
            b.iter(|| bitmap_bridge::buffer_to_bitmap(&buffer, &mut bitmap, premultiply).unwrap());
        });
    }
    group.finish();
}

fn main() {
    print_simd_info();

    let mut criterion = Criterion::default().configure_from_args();
    bench_kernel(
        &mut criterion,
        "premultiply",
        (4, 4),
        bitmap_bridge::premultiply_rgba,
        naive_premultiply,
    );
    bench_kernel(
        &mut criterion,
        "unpremultiply",
        (4, 4),
        bitmap_bridge::unpremultiply_rgba,
        naive_unpremultiply,
    );
    bench_kernel(
        &mut criterion,
        "rgb565_to_rgba",
        (2, 4),
        bitmap_bridge::rgb565_to_rgba,
        naive_565_to_rgba,
    );
    bench_kernel(
        &mut criterion,
        "rgba_to_rgb565",
        (4, 2),
        bitmap_bridge::rgba_to_rgb565,
        naive_rgba_to_565,
    );
    bench_kernel(
        &mut criterion,
        "rgba_to_gray",
        (4, 1),
        bitmap_bridge::rgba_to_gray,
        naive_rgba_to_gray,
    );
    bench_import(&mut criterion);
    bench_export(&mut criterion);
    criterion.final_summary();
}
