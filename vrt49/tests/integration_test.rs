// SPDX-FileCopyrightText: 2025 The vrt49 Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::HashMap;
use std::io::Write;
use std::net::{Ipv4Addr, UdpSocket};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use vrt49::command_prelude::*;
use vrt49::prelude::*;
use vrt49::{
    AnyPacket, ContextAssociationLists, DataType, DeviceId, FormattedGps, Gain, LeapSeconds,
    PacketDispatcher, PacketFactoryChain, RealComplexType, StandardDataPacket, Timestamp,
    TsField, VrlFrame, VrtContextListener, VrtEvent, VrtReader, VrtReaderConfig,
};

fn log_init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn standard_data_encode_decode() {
    log_init();
    // Int16 complex-cartesian, unframed, 1024 complex samples.
    let mut packet =
        StandardDataPacket::new(DataType::Int16, RealComplexType::ComplexCartesian, 0).unwrap();
    let samples = vec![0u8; 1024 * 4];
    packet.set_signal_payload(&samples).unwrap();
    packet.update_packet_size();

    let id = packet.class_id().unwrap().as_u64();
    // OUI FF-FF-FA, type code 3 (Int16), complex-cartesian structure
    // bit, zero vector-size field.
    assert_eq!(id, 0x00FF_FFFA_0013_0000);
    assert_eq!(id & 0xFFFF, 0);

    assert!(matches!(
        packet.header().packet_type(),
        PacketType::SignalData
    ));
    assert!(packet.header().class_id_included());
    assert!(!packet.header().trailer_included());
    // 1024 complex Int16 samples occupy 4096 payload bytes; the header
    // length field covers the prologue (header + stream ID + class ID)
    // plus the payload.
    assert_eq!(packet.header().as_u32() >> 28, 0b0001);
    assert_eq!(packet.header().packet_size() as usize, 4096 / 4 + 4);

    let bytes = packet.to_bytes().unwrap();
    let parsed = Vrt::try_from(bytes.as_slice()).unwrap();
    let classified = PacketFactoryChain::new().wrap(parsed);
    match classified {
        AnyPacket::StandardData(p) => {
            let pf = p.payload_format().unwrap();
            assert_eq!(pf.real_complex_type(), RealComplexType::ComplexCartesian);
            assert_eq!(pf.data_item_size_bits(), 16);
            assert_eq!(p.frame_size().unwrap(), 1);
        }
        other => panic!("expected standard data, got {other:?}"),
    }
}

#[test]
fn context_cif_round_trip() {
    log_init();
    let mut packet = Vrt::new_context_packet();
    let context = packet.payload_mut().context_mut().unwrap();
    context.set_rf_ref_freq_hz(Some(3e9));
    context.set_bandwidth_hz(Some(1e6));
    packet.update_packet_size();

    let bytes = packet.to_bytes().unwrap();
    // Payload begins after header + stream ID.
    let cif0 = u32::from_be_bytes(bytes[8..12].try_into().unwrap());
    assert_eq!(cif0, 0x2800_0000);
    // Bandwidth (higher CIF bit) precedes RF frequency, both radix-20.
    let bw = u64::from_be_bytes(bytes[12..20].try_into().unwrap());
    let rf = u64::from_be_bytes(bytes[20..28].try_into().unwrap());
    assert_eq!(bw as f64 / (1u64 << 20) as f64, 1e6);
    assert_eq!(rf as f64 / (1u64 << 20) as f64, 3e9);

    let parsed = Vrt::try_from(bytes.as_slice()).unwrap();
    let context = parsed.payload().context().unwrap();
    assert_eq!(context.rf_ref_freq_hz(), Some(3e9));
    assert_eq!(context.bandwidth_hz(), Some(1e6));
}

#[test]
fn context_records_round_trip() {
    log_init();
    let mut packet = Vrt::new_context_packet();
    let context = packet.payload_mut().context_mut().unwrap();

    let mut gps = FormattedGps::default();
    gps.set_manufacturer_oui(0x00_1234);
    gps.set_latitude_deg(Some(38.889484));
    gps.set_longitude_deg(Some(-77.035278));
    context.set_formatted_gps(Some(gps));

    let mut lists = ContextAssociationLists::default();
    lists.set_source_list(vec![0x10, 0x11]);
    lists.set_system_list(vec![0x20]);
    context.set_context_association_lists(Some(lists.clone()));

    context.set_device_id(Some(DeviceId::new(0xAB_CDEF, 0x42)));
    context.set_gain(Some(Gain::new(10.0, -2.5)));
    context.set_reference_level_db(Some(-30.0));
    context.set_temperature_c(Some(36.5));
    packet.update_packet_size();

    let bytes = packet.to_bytes().unwrap();
    assert_eq!(bytes.len() / 4, packet.header().packet_size() as usize);

    let parsed = Vrt::try_from(bytes.as_slice()).unwrap();
    let context = parsed.payload().context().unwrap();
    let gps = context.formatted_gps().unwrap();
    assert!((gps.latitude_deg().unwrap() - 38.889484).abs() < 1e-6);
    assert!((gps.longitude_deg().unwrap() + 77.035278).abs() < 1e-6);
    assert_eq!(gps.altitude_m(), None);
    assert_eq!(
        context.context_association_lists().unwrap().source_list(),
        &[0x10, 0x11]
    );
    assert_eq!(context.device_id().unwrap().manufacturer_oui(), 0xAB_CDEF);
    assert_eq!(context.reference_level_db(), Some(-30.0));
    assert_eq!(context.temperature_c(), Some(36.5));
}

#[test]
fn cif3_timestamp_sized_fields() {
    log_init();
    let mut packet = Vrt::new_context_packet();
    packet.set_integer_timestamp(Some(1000), Tsi::Utc).unwrap();
    packet
        .set_fractional_timestamp(Some(250_000), Tsf::RealTimePs)
        .unwrap();
    let context = packet.payload_mut().context_mut().unwrap();
    // Age carries one integer word and one fractional double-word,
    // mirroring the packet's TSI/TSF modes.
    context.set_age(Some(TsField::new(Some(5), Some(77))));
    context.set_network_id(Some(9));
    packet.update_packet_size();

    let bytes = packet.to_bytes().unwrap();
    assert_eq!(bytes.len() / 4, packet.header().packet_size() as usize);

    let parsed = Vrt::try_from(bytes.as_slice()).unwrap();
    let context = parsed.payload().context().unwrap();
    let age = context.age().unwrap();
    assert_eq!(age.integer(), Some(5));
    assert_eq!(age.fractional(), Some(77));
    assert_eq!(context.network_id(), Some(&9));
}

#[cfg(feature = "cif7")]
#[test]
fn cif7_attribute_round_trip() {
    log_init();
    let mut packet = Vrt::new_context_packet();
    let context = packet.payload_mut().context_mut().unwrap();
    let mut cif7 = Cif7::default();
    cif7.set_current();
    cif7.set_average();
    cif7.set_median();
    context.cif7 = Some(cif7);
    context.set_bandwidth_hz(Some(8e6));
    context.set_bandwidth_hz_attributes(Some(vec![8.5e6, 7.5e6]));
    packet.update_packet_size();

    let bytes = packet.to_bytes().unwrap();
    let parsed = Vrt::try_from(bytes.as_slice()).unwrap();
    let context = parsed.payload().context().unwrap();
    assert_eq!(context.bandwidth_hz(), Some(8e6));
    assert_eq!(context.bandwidth_hz_attributes(), vec![8.5e6, 7.5e6]);
}

#[test]
fn command_packets_round_trip() {
    log_init();
    let mut packet = Vrt::new_control_packet();
    packet.set_stream_id(Some(0xDEADBEEF));
    let command = packet.payload_mut().command_mut().unwrap();
    command.set_message_id(123);
    command.set_controllee_id(Some(7)).unwrap();
    let control = command.payload_mut().control_mut().unwrap();
    control.set_rf_ref_freq_hz(Some(100e6));
    control.set_sample_rate_sps(Some(128e6));
    packet.update_packet_size();

    let bytes = packet.to_bytes().unwrap();
    let parsed = Vrt::try_from(bytes.as_slice()).unwrap();
    let command = parsed.payload().command().unwrap();
    assert_eq!(command.message_id(), 123);
    assert_eq!(command.controllee_id(), Some(7));
    let control = command.payload().control().unwrap();
    assert_eq!(control.rf_ref_freq_hz(), Some(100e6));
    assert_eq!(control.sample_rate_sps(), Some(128e6));
}

#[test]
fn cancellation_packets_round_trip() {
    log_init();
    let mut packet = Vrt::new_cancellation_packet();
    packet.set_stream_id(Some(0xB00F));
    let command = packet.payload_mut().command_mut().unwrap();
    command.set_message_id(77);
    let cancel = command.payload_mut().cancellation_mut().unwrap();
    cancel.cif0_mut().set_bandwidth();
    cancel.cif0_mut().set_rf_ref_freq();
    let mut cif1 = Cif1::default();
    cif1.set_spectrum();
    cancel.set_cif1(Some(cif1));
    packet.update_packet_size();

    let bytes = packet.to_bytes().unwrap();
    // header + stream ID + CAM + message ID + CIF0 + CIF1; a
    // cancellation carries no data fields behind its indicators.
    assert_eq!(bytes.len(), 4 * 6);

    let parsed = Vrt::try_from(bytes.as_slice()).unwrap();
    assert!(parsed.header().is_cancellation_packet().unwrap());
    let command = parsed.payload().command().unwrap();
    assert_eq!(command.message_id(), 77);
    assert!(matches!(command.payload(), CommandPayload::Cancellation(_)));
    let cancel = command.payload().cancellation().unwrap();
    assert!(cancel.cif0().bandwidth());
    assert!(cancel.cif0().rf_ref_freq());
    assert!(!cancel.cif0().sample_rate());
    assert!(cancel.cif1().unwrap().spectrum());
    assert!(cancel.cif2().is_none());
}

#[test]
fn ack_packets_round_trip() {
    log_init();
    let mut packet = Vrt::new_exec_ack_packet();
    {
        let command = packet.payload_mut().command_mut().unwrap();
        let mut cam = command.cam();
        cam.set_warning();
        cam.set_error();
        command.set_cam(cam);
        let ack = command.payload_mut().exec_ack_mut().unwrap();
        let mut response = AckResponse::default();
        response.set_param_out_of_range();
        ack.set_bandwidth(AckLevel::Error, Some(response));
        ack.set_sample_rate(AckLevel::Warning, Some(AckResponse::default()));
    }
    packet.update_packet_size();

    let bytes = packet.to_bytes().unwrap();
    let parsed = Vrt::try_from(bytes.as_slice()).unwrap();
    assert!(parsed.header().is_ack_packet().unwrap());
    let ack = parsed.payload().command().unwrap().payload().exec_ack().unwrap();
    let (level, response) = ack.bandwidth().unwrap();
    assert_eq!(level, AckLevel::Error);
    assert!(response.param_out_of_range());
    assert!(matches!(ack.sample_rate().unwrap().0, AckLevel::Warning));
}

#[test]
fn query_ack_round_trip() {
    log_init();
    let mut packet = Vrt::new_query_ack_packet();
    {
        let command = packet.payload_mut().command_mut().unwrap();
        let ack = command.payload_mut().query_ack_mut().unwrap();
        ack.set_bandwidth_hz(Some(100e6));
    }
    packet.update_packet_size();
    let bytes = packet.to_bytes().unwrap();
    let parsed = Vrt::try_from(bytes.as_slice()).unwrap();
    let command = parsed.payload().command().unwrap();
    assert!(matches!(command.payload(), CommandPayload::QueryAck(_)));
    assert_eq!(
        command.payload().query_ack().unwrap().bandwidth_hz(),
        Some(100e6)
    );
}

#[test]
fn missed_packet_detection() {
    log_init();
    let (tx, rx) = mpsc::channel();
    struct Errors(mpsc::Sender<String>);
    impl VrtContextListener for Errors {
        fn error_occurred(&mut self, _event: &VrtEvent, msg: &str) {
            self.0.send(msg.to_string()).unwrap();
        }
    }
    let mut dispatcher = PacketDispatcher::new(Box::new(Errors(tx)), "test".into(), None);
    for count in [0u8, 1, 2, 4, 5] {
        let mut p = Vrt::new_signal_data_packet();
        p.set_stream_id(Some(42));
        p.set_class_id(Some(ClassIdentifier::new(0x12_3456, 1, 2)));
        p.header_mut().set_packet_count(count);
        p.update_packet_size();
        dispatcher.handle_packet(p);
    }
    let errors: Vec<String> = rx.try_iter().collect();
    assert_eq!(
        errors,
        vec!["Missed packets 3 (inclusive) to 4 (exclusive).".to_string()]
    );
}

#[test]
fn leap_second_parse_matches_following_midnight() {
    log_init();
    // The built-in table stops at 2015, so extend it through the
    // 2016-12-31 insertion the way a deployed tai-utc.dat would.
    let mut file = tempfile::NamedTempFile::new().unwrap();
    for line in LeapSeconds::builtin_lines() {
        writeln!(file, "{line}").unwrap();
    }
    writeln!(
        file,
        " 2017 JAN  1 =JD 2457754.5  TAI-UTC=  37.0       S + (MJD - 41317.) X 0.0      S"
    )
    .unwrap();
    file.flush().unwrap();

    let ls = Arc::new(LeapSeconds::from_file(file.path()).unwrap());
    let leap = Timestamp::parse_time("2016-12-31T23:59:60Z", Tsi::Utc, ls.clone()).unwrap();
    assert!(ls.is_leap_second(leap.seconds_utc().unwrap() as i64).unwrap());

    let midnight =
        Timestamp::for_time(2017, 1, 1, 0, 0, 0, 0, 0, Tsi::Utc, ls.clone()).unwrap();
    assert_eq!(leap.seconds_utc().unwrap(), midnight.seconds_utc().unwrap());

    // The leap second shares the POSIX count of the following second's
    // start.
    let posix_midnight = LeapSeconds::ymd_to_posix_day(2017, 1, 1) as i64 * 86_400;
    assert_eq!(leap.seconds_posix().unwrap(), posix_midnight);
    assert_eq!(
        ls.to_string_utc(leap.seconds_utc().unwrap() as i64, None)
            .unwrap(),
        "2016-12-31T23:59:60Z"
    );
}

#[test]
fn vrl_frame_with_two_packets() {
    log_init();
    let mut ctx = Vrt::new_context_packet();
    ctx.set_stream_id(Some(1));
    ctx.payload_mut()
        .context_mut()
        .unwrap()
        .set_bandwidth_hz(Some(5e6));
    ctx.update_packet_size();

    let mut data = Vrt::new_signal_data_packet();
    data.set_stream_id(Some(1));
    data.set_signal_payload(&[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
    data.update_packet_size();

    let mut frame = VrlFrame::new();
    frame.set_use_crc(true);
    frame.set_frame_count(0xFFE);
    frame.packets_mut().push(ctx.clone());
    frame.packets_mut().push(data.clone());
    let bytes = frame.to_bytes().unwrap();

    let parsed = VrlFrame::from_bytes(&bytes).unwrap();
    assert!(parsed.is_crc_valid());
    assert_eq!(parsed.packets().len(), 2);
    assert_eq!(parsed.frame_count(), 0xFFE);
    assert_eq!(parsed.packets()[0], ctx);
    assert_eq!(parsed.packets()[1], data);
}

struct Collector {
    tx: mpsc::Sender<Event>,
}

#[derive(Debug)]
enum Event {
    Packet(Option<u32>),
    Initial {
        msg: String,
        collected: usize,
        has_primary: bool,
    },
    Error(String),
}

impl VrtContextListener for Collector {
    fn received_packet(&mut self, _event: &VrtEvent, packet: &Vrt) {
        self.tx.send(Event::Packet(packet.stream_id())).unwrap();
    }
    fn received_initial_context(
        &mut self,
        _event: &VrtEvent,
        error_msg: &str,
        _data: Option<&Vrt>,
        context: Option<&Vrt>,
        collected: &HashMap<u32, Vrt>,
    ) {
        self.tx
            .send(Event::Initial {
                msg: error_msg.to_string(),
                collected: collected.len(),
                has_primary: context.is_some(),
            })
            .unwrap();
    }
    fn error_occurred(&mut self, _event: &VrtEvent, msg: &str) {
        self.tx.send(Event::Error(msg.to_string())).unwrap();
    }
}

/// End-to-end: a reader on a loopback socket receives both a naked
/// packet and a VRL-framed pair.
#[test]
fn reader_receives_over_loopback() {
    log_init();
    let port = 49_871;
    let (tx, rx) = mpsc::channel();
    let mut reader = VrtReader::start(
        VrtReaderConfig {
            group: Ipv4Addr::LOCALHOST,
            port,
            recv_buf_size: 0,
            ..Default::default()
        },
        Box::new(Collector { tx }),
    )
    .expect("reader start");

    let sender = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
    let dest = (Ipv4Addr::LOCALHOST, port);

    let mut naked = Vrt::new_signal_data_packet();
    naked.set_stream_id(Some(0x11));
    naked.set_signal_payload(&[0; 8]).unwrap();
    naked.update_packet_size();
    sender.send_to(&naked.to_bytes().unwrap(), dest).unwrap();

    let mut framed = Vrt::new_context_packet();
    framed.set_stream_id(Some(0x22));
    framed.update_packet_size();
    let mut frame = VrlFrame::new();
    frame.set_use_crc(true);
    frame.packets_mut().push(framed);
    sender.send_to(&frame.to_bytes().unwrap(), dest).unwrap();

    let mut streams = Vec::new();
    for _ in 0..2 {
        match rx.recv_timeout(Duration::from_secs(5)) {
            Ok(Event::Packet(id)) => streams.push(id),
            Ok(other) => panic!("unexpected event: {other:?}"),
            Err(e) => panic!("timed out waiting for packets: {e}"),
        }
    }
    streams.sort_unstable();
    assert_eq!(streams, vec![Some(0x11), Some(0x22)]);

    reader.stop(true).unwrap();
}

/// End-to-end initial-context flow: data plus its matching context
/// completes with no error message.
#[test]
fn reader_initial_context_over_loopback() {
    log_init();
    let port = 49_873;
    let (tx, rx) = mpsc::channel();
    let mut reader = VrtReader::start(
        VrtReaderConfig {
            group: Ipv4Addr::LOCALHOST,
            port,
            recv_buf_size: 0,
            timeout: Some(Duration::from_secs(10)),
            ..Default::default()
        },
        Box::new(Collector { tx }),
    )
    .expect("reader start");

    let sender = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
    let dest = (Ipv4Addr::LOCALHOST, port);

    let mut data = Vrt::new_signal_data_packet();
    data.set_stream_id(Some(5));
    data.set_signal_payload(&[0; 4]).unwrap();
    data.update_packet_size();
    sender.send_to(&data.to_bytes().unwrap(), dest).unwrap();
    // Keep the data packet ahead of its context so the pairing sees
    // the primary stream first.
    std::thread::sleep(Duration::from_millis(100));

    // The context shares the data stream's counter (same stream code),
    // so its count continues the sequence.
    let mut context = Vrt::new_context_packet();
    context.set_stream_id(Some(5));
    context.header_mut().set_packet_count(1);
    context.update_packet_size();
    sender.send_to(&context.to_bytes().unwrap(), dest).unwrap();

    match rx.recv_timeout(Duration::from_secs(5)) {
        Ok(Event::Initial {
            msg,
            collected,
            has_primary,
        }) => {
            assert!(msg.is_empty(), "unexpected message: {msg}");
            assert_eq!(collected, 1);
            assert!(has_primary);
        }
        Ok(other) => panic!("unexpected event: {other:?}"),
        Err(e) => panic!("timed out waiting for initial context: {e}"),
    }

    reader.stop(true).unwrap();
}
