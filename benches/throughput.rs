//! CRC and frame codec throughput.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mfm_modbus::crc::crc16;
use mfm_modbus::frame::{build_request, build_response, parse_response};
use mfm_modbus::{bytes_to_f32, registers, ByteOrder};

fn bench_crc(c: &mut Criterion) {
    let request = [0x01, 0x04, 0x00, 0x18, 0x00, 0x02];
    let response = [0x01, 0x04, 0x04, 0x41, 0x48, 0x00, 0x00];

    c.bench_function("crc16_request", |b| b.iter(|| crc16(black_box(&request))));
    c.bench_function("crc16_response", |b| b.iter(|| crc16(black_box(&response))));
}

fn bench_frames(c: &mut Criterion) {
    let register = registers::MFM_TOTAL_KW;
    let order = ByteOrder::BigEndian;
    let frame = build_response(1, 230.0, order);
    let swapped = [0x00, 0x00, 0x43, 0x66];
    let swap = ByteOrder::BigEndianSwap;

    c.bench_function("build_request", |b| {
        b.iter(|| build_request(black_box(1), black_box(register)))
    });
    c.bench_function("parse_response", |b| {
        b.iter(|| parse_response(black_box(&frame), 1, order))
    });
    c.bench_function("bytes_to_f32_swapped", |b| {
        b.iter(|| bytes_to_f32(black_box(swapped), swap))
    });
}

criterion_group!(benches, bench_crc, bench_frames);
criterion_main!(benches);
