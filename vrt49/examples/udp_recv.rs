// SPDX-FileCopyrightText: 2025 The vrt49 Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Joins a multicast group and prints what the receive pipeline sees.
//!
//! Run with: `cargo run --example udp_recv -- 239.0.0.1 4991`

use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::time::Duration;

use vrt49::prelude::*;
use vrt49::{VrtContextListener, VrtEvent, VrtReader, VrtReaderConfig};

struct PrintListener;

impl VrtContextListener for PrintListener {
    fn received_data_packet(&mut self, _event: &VrtEvent, packet: &Vrt) {
        println!(
            "Got signal data packet with stream ID {:?} and a payload of {} bytes",
            packet.stream_id(),
            packet.payload().signal_data().map(|d| d.payload_size_bytes()).unwrap_or(0)
        );
    }

    fn received_context_packet(&mut self, _event: &VrtEvent, packet: &Vrt) {
        if let Ok(context) = packet.payload().context() {
            println!("Got context packet:\n{context}");
        }
    }

    fn received_initial_context(
        &mut self,
        _event: &VrtEvent,
        error_msg: &str,
        data: Option<&Vrt>,
        context: Option<&Vrt>,
        collected: &HashMap<u32, Vrt>,
    ) {
        println!(
            "Initial context resolved: msg={error_msg:?} data={} primary={} collected={:?}",
            data.is_some(),
            context.is_some(),
            collected.keys().collect::<Vec<_>>()
        );
    }

    fn error_occurred(&mut self, event: &VrtEvent, msg: &str) {
        eprintln!("[{}] error: {msg}", event.source);
    }
}

fn main() -> Result<(), VitaError> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let group: Ipv4Addr = args
        .next()
        .unwrap_or_else(|| "239.0.0.1".into())
        .parse()
        .expect("bad group address");
    let port: u16 = args
        .next()
        .unwrap_or_else(|| "4991".into())
        .parse()
        .expect("bad port");

    // The reader owns its threads; keep it alive until interrupted.
    let _reader = VrtReader::start(
        VrtReaderConfig {
            group,
            port,
            timeout: Some(Duration::from_secs(10)),
            ..Default::default()
        },
        Box::new(PrintListener),
    )?;

    println!("Listening on {group}:{port} - press Ctrl-C to exit");
    loop {
        std::thread::sleep(Duration::from_secs(1));
    }
}
