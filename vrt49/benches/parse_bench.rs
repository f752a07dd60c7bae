// SPDX-FileCopyrightText: 2025 The vrt49 Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use vrt49::prelude::*;
use vrt49::VrlFrame;

fn context_packet_bytes() -> Vec<u8> {
    let mut packet = Vrt::new_context_packet();
    packet.set_stream_id(Some(1));
    let context = packet.payload_mut().context_mut().unwrap();
    context.set_bandwidth_hz(Some(8e6));
    context.set_rf_ref_freq_hz(Some(100e6));
    context.set_sample_rate_sps(Some(16e6));
    packet.update_packet_size();
    packet.to_bytes().unwrap()
}

fn data_packet_bytes() -> Vec<u8> {
    let mut packet = Vrt::new_signal_data_packet();
    packet.set_stream_id(Some(1));
    packet.set_signal_payload(&vec![0xA5u8; 4096]).unwrap();
    packet.update_packet_size();
    packet.to_bytes().unwrap()
}

fn parse_benchmarks(c: &mut Criterion) {
    let context = context_packet_bytes();
    c.bench_function("parse_context_packet", |b| {
        b.iter(|| Vrt::try_from(black_box(context.as_slice())).unwrap())
    });

    let data = data_packet_bytes();
    c.bench_function("parse_data_packet_4k", |b| {
        b.iter(|| Vrt::try_from(black_box(data.as_slice())).unwrap())
    });

    let mut frame = VrlFrame::new();
    frame.set_use_crc(true);
    frame
        .packets_mut()
        .push(Vrt::try_from(context.as_slice()).unwrap());
    frame
        .packets_mut()
        .push(Vrt::try_from(data.as_slice()).unwrap());
    let frame_bytes = frame.to_bytes().unwrap();
    c.bench_function("parse_vrl_frame", |b| {
        b.iter(|| VrlFrame::from_bytes(black_box(&frame_bytes)).unwrap())
    });
}

criterion_group!(benches, parse_benchmarks);
criterion_main!(benches);
