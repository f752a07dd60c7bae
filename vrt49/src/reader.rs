// SPDX-FileCopyrightText: 2025 The vrt49 Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
/*!
Multicast receive pipeline.

Two threads cooperate per [`VrtReader`]: a socket thread receives
datagrams, splits VRL frames into their packets, and pushes everything
onto a bounded queue; a dispatch thread pops, tracks packet and frame
counters, runs the initial-context state machine, and drives the
[`VrtContextListener`] callbacks. The dispatcher is usable on its own
(without sockets) to replay captured packets.
*/

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle, ThreadId};
use std::time::{Duration, Instant};

use crate::cif0::Cif0Manipulators;
use crate::frame::VrlFrame;
use crate::packet_header::PacketType;
use crate::socket::{MulticastSocket, RECV_TIMEOUT};
use crate::vrt::Vrt;
use crate::VitaError;

/// Timeout message when no context stream ever showed up.
pub const NO_CONTEXT_STREAM: &str = "Timeout with no context streams found.";
/// Timeout message when no data stream ever showed up.
pub const NO_DATA_STREAM: &str = "Timeout with no data streams found.";

/// Default bounded queue capacity.
pub const DEFAULT_QUEUE_SIZE: usize = 2500;

/// Context attached to every listener callback: where the event came
/// from and, when applicable, the packet involved.
#[derive(Clone, Debug, Default)]
pub struct VrtEvent {
    /// Human-readable event source (reader address or "dispatcher").
    pub source: String,
    /// The packet the event refers to, if any.
    pub packet: Option<Vrt>,
}

/// Callbacks driven by the dispatch thread. All methods default to
/// no-ops so implementors pick what they care about.
#[allow(unused_variables)]
pub trait VrtContextListener: Send {
    /// A packet arrived while the reader runs in legacy (bypass) mode.
    fn received_packet(&mut self, event: &VrtEvent, packet: &Vrt) {}

    /// A data packet arrived after the initial context was resolved.
    fn received_data_packet(&mut self, event: &VrtEvent, packet: &Vrt) {}

    /// A context packet arrived after the initial context was resolved.
    fn received_context_packet(&mut self, event: &VrtEvent, packet: &Vrt) {}

    /// The initial-context pairing completed (or timed out). An empty
    /// `error_msg` means a clean completion; otherwise it describes
    /// what was missing or inconsistent.
    fn received_initial_context(
        &mut self,
        event: &VrtEvent,
        error_msg: &str,
        data: Option<&Vrt>,
        context: Option<&Vrt>,
        collected: &HashMap<u32, Vrt>,
    ) {
    }

    /// A stream-continuity or structural error was observed.
    fn error_occurred(&mut self, event: &VrtEvent, msg: &str) {}

    /// A recoverable condition was observed.
    fn warning_occurred(&mut self, event: &VrtEvent, msg: &str) {}
}

/// Items flowing from the socket thread to the dispatch thread. Frame
/// boundaries ride the queue so the frame counter stays owned by the
/// dispatcher.
#[derive(Clone, Debug)]
pub enum QueueItem {
    /// One VRT packet (naked or unwrapped from a frame).
    Packet(Vrt),
    /// A VRL frame header was seen with this frame count.
    FrameBoundary(u16),
    /// A datagram that didn't parse or failed its CRC.
    Corrupt(String),
}

/// Bounded MPSC queue with the reader's overflow policies: block the
/// producer, or purge the oldest quarter with a warning.
pub struct PacketQueue {
    inner: Mutex<VecDeque<QueueItem>>,
    not_empty: Condvar,
    not_full: Condvar,
    max_size: usize,
    purge_when_full: bool,
}

impl PacketQueue {
    /// Creates a queue holding at most `max_size` items.
    pub fn new(max_size: usize, purge_when_full: bool) -> PacketQueue {
        PacketQueue {
            inner: Mutex::new(VecDeque::with_capacity(max_size.min(DEFAULT_QUEUE_SIZE))),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
            max_size: max_size.max(1),
            purge_when_full,
        }
    }

    /// Pushes an item, applying the overflow policy when full.
    pub fn push(&self, item: QueueItem) {
        let mut q = self.inner.lock().unwrap();
        while q.len() >= self.max_size {
            if self.purge_when_full {
                let drop_count = (self.max_size / 4).max(1);
                log::warn!("packet queue filled, dropping {drop_count} items");
                let q_len = q.len();
                q.drain(..drop_count.min(q_len));
            } else {
                q = self.not_full.wait(q).unwrap();
            }
        }
        q.push_back(item);
        self.not_empty.notify_one();
    }

    /// Pops an item, waiting up to `timeout` for one to arrive.
    pub fn pop(&self, timeout: Duration) -> Option<QueueItem> {
        let mut q = self.inner.lock().unwrap();
        if q.is_empty() {
            let (guard, _) = self.not_empty.wait_timeout(q, timeout).unwrap();
            q = guard;
        }
        let item = q.pop_front();
        if item.is_some() {
            self.not_full.notify_one();
        }
        item
    }

    /// Current queue depth.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

enum DispatchMode {
    /// No timeout configured: every packet goes to `received_packet`.
    Legacy,
    /// Pairing a data stream with its context streams.
    Collecting,
    /// Initial context resolved; packets flow to the typed callbacks.
    Found,
}

/// Per-stream packet counting, frame counting, and the initial-context
/// state machine. Owned by the dispatch thread, but usable directly
/// for socketless replay.
pub struct PacketDispatcher {
    listener: Box<dyn VrtContextListener>,
    source: String,
    packet_counters: HashMap<u64, u8>,
    frame_counter: Option<u16>,
    mode: DispatchMode,
    timeout: Duration,
    start_time: Option<Instant>,
    primary_stream_id: Option<u32>,
    initial_data: Option<Vrt>,
    primary_context: Option<Vrt>,
    collected: HashMap<u32, Vrt>,
    required: BTreeSet<u32>,
}

impl PacketDispatcher {
    /// Creates a dispatcher. `timeout = None` selects legacy mode
    /// (no initial-context pairing).
    pub fn new(
        listener: Box<dyn VrtContextListener>,
        source: String,
        timeout: Option<Duration>,
    ) -> PacketDispatcher {
        PacketDispatcher {
            listener,
            source,
            packet_counters: HashMap::new(),
            frame_counter: None,
            mode: match timeout {
                Some(_) => DispatchMode::Collecting,
                None => DispatchMode::Legacy,
            },
            timeout: timeout.unwrap_or_default(),
            start_time: None,
            primary_stream_id: None,
            initial_data: None,
            primary_context: None,
            collected: HashMap::new(),
            required: BTreeSet::new(),
        }
    }

    fn event(&self, packet: Option<&Vrt>) -> VrtEvent {
        VrtEvent {
            source: self.source.clone(),
            packet: packet.cloned(),
        }
    }

    /// Reports a corrupt-datagram or transport condition to the
    /// listener.
    pub fn report_error(&mut self, msg: &str) {
        let event = self.event(None);
        self.listener.error_occurred(&event, msg);
    }

    /// Feeds one queue item through the dispatcher.
    pub fn handle_item(&mut self, item: QueueItem) {
        match item {
            QueueItem::Packet(p) => self.handle_packet(p),
            QueueItem::FrameBoundary(count) => self.handle_frame(count),
            QueueItem::Corrupt(msg) => self.report_error(&msg),
        }
    }

    /// Checks the 12-bit frame counter for continuity. Per-stream
    /// packet counters are left untouched on a frame gap.
    pub fn handle_frame(&mut self, count: u16) {
        let count = count & 0xFFF;
        let expected = self.frame_counter;
        self.frame_counter = Some((count + 1) & 0xFFF);
        if let Some(expected) = expected {
            if expected != count {
                let event = self.event(None);
                self.listener.error_occurred(
                    &event,
                    &format!("Missed frames {expected} (inclusive) to {count} (exclusive)."),
                );
            }
        }
    }

    /// Feeds one packet through counter checks and the state machine.
    pub fn handle_packet(&mut self, packet: Vrt) {
        if self.start_time.is_none() && matches!(self.mode, DispatchMode::Collecting) {
            // Start the clock on the first packet received.
            self.start_time = Some(Instant::now());
        }

        if let Err(e) = packet.validate(false) {
            let event = self.event(Some(&packet));
            self.listener.error_occurred(&event, &e.to_string());
            return;
        }

        let code = packet.stream_code();
        let count = packet.header().packet_count();
        let expected = *self.packet_counters.get(&code).unwrap_or(&count);
        self.packet_counters.insert(code, (count + 1) & 0xF);
        if count != expected {
            let event = self.event(Some(&packet));
            self.listener.error_occurred(
                &event,
                &format!("Missed packets {expected} (inclusive) to {count} (exclusive)."),
            );
        }

        match self.mode {
            DispatchMode::Legacy => {
                let event = self.event(None);
                self.listener.received_packet(&event, &packet);
            }
            DispatchMode::Found => {
                let event = self.event(None);
                if packet.header().packet_type().is_data() {
                    self.listener.received_data_packet(&event, &packet);
                } else {
                    self.listener.received_context_packet(&event, &packet);
                }
            }
            DispatchMode::Collecting => self.collect(packet),
        }
    }

    fn fire_initial_context(&mut self, msg: &str) {
        let event = VrtEvent {
            source: self.source.clone(),
            packet: None,
        };
        self.listener.received_initial_context(
            &event,
            msg,
            self.initial_data.as_ref(),
            self.primary_context.as_ref(),
            &self.collected,
        );
        self.mode = DispatchMode::Found;
        self.initial_data = None;
        self.primary_context = None;
        self.primary_stream_id = None;
        self.collected.clear();
        self.required.clear();
    }

    fn timed_out(&self) -> bool {
        !self.timeout.is_zero()
            && self
                .start_time
                .map(|t| t.elapsed() >= self.timeout)
                .unwrap_or(false)
    }

    fn stream_set(collected: &HashMap<u32, Vrt>) -> Vec<u32> {
        let mut ids: Vec<u32> = collected.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    fn collect(&mut self, packet: Vrt) {
        let timeout = self.timed_out();

        // Data packets nominate the primary stream.
        if packet.header().packet_type().is_data() {
            let id = packet.stream_id();
            self.primary_stream_id = id;
            self.initial_data = Some(packet);
            if id.is_none() {
                // Unidentified stream: nothing to pair with.
                self.fire_initial_context("");
            } else if timeout {
                self.fire_initial_context(NO_CONTEXT_STREAM);
            }
            return;
        }

        // Everything else collects as context.
        let id = packet.stream_id().unwrap_or(0);
        let is_plain_context = packet.header().packet_type() == PacketType::Context;
        self.collected.insert(id, packet.clone());

        // A primary stream answered by a non-context packet (rare).
        if self.primary_stream_id == Some(id) && !is_plain_context {
            if self.collected.len() == 1 {
                self.fire_initial_context("");
            } else {
                let msg = format!(
                    "Context packets do not follow stream ID rules (found streams {:?} but expected only {:?}).",
                    Self::stream_set(&self.collected),
                    self.required
                );
                self.fire_initial_context(&msg);
            }
            return;
        }

        if is_plain_context {
            if self.primary_stream_id == Some(id) {
                // The primary context names the rest of the required set.
                self.primary_context = Some(packet.clone());
                self.required.insert(id);
            }
            if let Ok(context) = packet.payload().context() {
                if let Some(assoc) = context.context_association_lists() {
                    self.required.extend(assoc.source_list().iter().copied());
                    self.required.extend(assoc.system_list().iter().copied());
                }
            }
        }

        let found_ctx = self.primary_context.is_some();
        let same_size = self.collected.len() == self.required.len();
        let found_all = self
            .required
            .iter()
            .all(|id| self.collected.contains_key(id));

        if found_ctx && found_all {
            if same_size {
                self.fire_initial_context("");
            } else {
                let msg = format!(
                    "Context packets do not follow stream ID rules (found streams {:?} but expected {:?}).",
                    Self::stream_set(&self.collected),
                    self.required
                );
                self.fire_initial_context(&msg);
            }
            return;
        }

        if timeout {
            if found_ctx {
                let msg = format!(
                    "Timeout before all required context could be found (found streams {:?} but expected {:?}).",
                    Self::stream_set(&self.collected),
                    self.required
                );
                self.fire_initial_context(&msg);
            } else if self.initial_data.is_none() {
                self.fire_initial_context(NO_DATA_STREAM);
            } else {
                let id = self.primary_stream_id.unwrap_or(0);
                let msg = format!("Could not find IF Context for stream ID {id}.");
                self.fire_initial_context(&msg);
            }
        }
    }
}

/// Reader configuration. The defaults mirror a plain multicast
/// subscription with a blocking queue and legacy dispatch.
pub struct VrtReaderConfig {
    /// Multicast group (or unicast address) to bind.
    pub group: Ipv4Addr,
    /// UDP port.
    pub port: u16,
    /// Interface address to join on (`0.0.0.0` = kernel's choice).
    pub interface: Ipv4Addr,
    /// SO_RCVBUF size, 0 to leave the system default.
    pub recv_buf_size: usize,
    /// Bounded queue capacity.
    pub queue_size: usize,
    /// Drop the oldest quarter of the queue instead of blocking the
    /// socket thread when full.
    pub purge_when_full: bool,
    /// Initial-context timeout; `None` selects legacy dispatch.
    pub timeout: Option<Duration>,
}

impl Default for VrtReaderConfig {
    fn default() -> Self {
        VrtReaderConfig {
            group: Ipv4Addr::UNSPECIFIED,
            port: 4991,
            interface: Ipv4Addr::UNSPECIFIED,
            recv_buf_size: 1024 * 1024,
            queue_size: DEFAULT_QUEUE_SIZE,
            purge_when_full: false,
            timeout: None,
        }
    }
}

/// Handle to a running receive pipeline.
pub struct VrtReader {
    stop_flag: Arc<AtomicBool>,
    socket_thread: Option<JoinHandle<()>>,
    dispatch_thread: Option<JoinHandle<()>>,
    thread_ids: Vec<ThreadId>,
}

impl VrtReader {
    /// Opens the socket and starts the socket and dispatch threads.
    ///
    /// # Errors
    /// Socket setup failures terminate construction.
    pub fn start(
        config: VrtReaderConfig,
        listener: Box<dyn VrtContextListener>,
    ) -> Result<VrtReader, VitaError> {
        let socket = MulticastSocket::open(
            config.group,
            config.port,
            config.interface,
            config.recv_buf_size,
        )?;
        let queue = Arc::new(PacketQueue::new(config.queue_size, config.purge_when_full));
        let stop_flag = Arc::new(AtomicBool::new(false));
        let source = format!("{}:{}", config.group, config.port);

        let socket_stop = stop_flag.clone();
        let socket_queue = queue.clone();
        let socket_thread = thread::Builder::new()
            .name("vrt49-socket".into())
            .spawn(move || socket_loop(socket, socket_queue, socket_stop))
            .map_err(|e| VitaError::SocketSetup(format!("thread spawn failed: {e}")))?;

        let dispatch_stop = stop_flag.clone();
        let mut dispatcher = PacketDispatcher::new(listener, source, config.timeout);
        let dispatch_thread = thread::Builder::new()
            .name("vrt49-dispatch".into())
            .spawn(move || {
                while !dispatch_stop.load(Ordering::Acquire) {
                    if let Some(item) = queue.pop(RECV_TIMEOUT) {
                        dispatcher.handle_item(item);
                    }
                }
            })
            .map_err(|e| VitaError::SocketSetup(format!("thread spawn failed: {e}")))?;

        let thread_ids = vec![socket_thread.thread().id(), dispatch_thread.thread().id()];
        Ok(VrtReader {
            stop_flag,
            socket_thread: Some(socket_thread),
            dispatch_thread: Some(dispatch_thread),
            thread_ids,
        })
    }

    /// Signals both threads to stop at their next timed wait. With
    /// `wait = true` the caller joins them before returning.
    ///
    /// # Errors
    /// `stop(true)` from inside one of the reader's own threads would
    /// deadlock and is rejected.
    pub fn stop(&mut self, wait: bool) -> Result<(), VitaError> {
        if wait && self.thread_ids.contains(&thread::current().id()) {
            return Err(VitaError::StopFromReaderThread);
        }
        self.stop_flag.store(true, Ordering::Release);
        if wait {
            if let Some(handle) = self.socket_thread.take() {
                handle.join().ok();
            }
            if let Some(handle) = self.dispatch_thread.take() {
                handle.join().ok();
            }
        }
        Ok(())
    }
}

impl Drop for VrtReader {
    fn drop(&mut self) {
        self.stop_flag.store(true, Ordering::Release);
    }
}

fn socket_loop(socket: MulticastSocket, queue: Arc<PacketQueue>, stop: Arc<AtomicBool>) {
    // Largest possible VRT packet (65535 words) exceeds a UDP payload,
    // so one datagram-sized buffer suffices.
    let mut buf = vec![0u8; 65536];
    while !stop.load(Ordering::Acquire) {
        let n = match socket.recv(&mut buf) {
            Ok(0) => continue,
            Ok(n) => n,
            Err(e)
                if e.kind() == std::io::ErrorKind::WouldBlock
                    || e.kind() == std::io::ErrorKind::TimedOut =>
            {
                continue
            }
            Err(e) => {
                // Transport errors reset the next iteration without
                // terminating the thread.
                log::warn!("recv failed: {e}");
                continue;
            }
        };
        let datagram = &buf[..n];

        if VrlFrame::is_frame(datagram) {
            match VrlFrame::from_bytes(datagram) {
                Ok(frame) => {
                    if frame.use_crc() && !frame.is_crc_valid() {
                        queue.push(QueueItem::Corrupt("Received corrupt frame".into()));
                        continue;
                    }
                    queue.push(QueueItem::FrameBoundary(frame.frame_count()));
                    for packet in frame.into_packets() {
                        queue.push(QueueItem::Packet(packet));
                    }
                }
                Err(e) => queue.push(QueueItem::Corrupt(format!("Received invalid frame: {e}"))),
            }
        } else {
            match Vrt::try_from(datagram) {
                Ok(packet) => queue.push(QueueItem::Packet(packet)),
                Err(e) => queue.push(QueueItem::Corrupt(format!("Received invalid packet: {e}"))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[derive(Debug, PartialEq)]
    enum Observed {
        Packet,
        Data(u32),
        Context(u32),
        Initial {
            msg: String,
            has_data: bool,
            has_primary: bool,
            collected: Vec<u32>,
        },
        Error(String),
    }

    struct Recorder(mpsc::Sender<Observed>);

    impl VrtContextListener for Recorder {
        fn received_packet(&mut self, _event: &VrtEvent, _packet: &Vrt) {
            self.0.send(Observed::Packet).unwrap();
        }
        fn received_data_packet(&mut self, _event: &VrtEvent, packet: &Vrt) {
            self.0
                .send(Observed::Data(packet.stream_id().unwrap_or(0)))
                .unwrap();
        }
        fn received_context_packet(&mut self, _event: &VrtEvent, packet: &Vrt) {
            self.0
                .send(Observed::Context(packet.stream_id().unwrap_or(0)))
                .unwrap();
        }
        fn received_initial_context(
            &mut self,
            _event: &VrtEvent,
            error_msg: &str,
            data: Option<&Vrt>,
            context: Option<&Vrt>,
            collected: &HashMap<u32, Vrt>,
        ) {
            let mut ids: Vec<u32> = collected.keys().copied().collect();
            ids.sort_unstable();
            self.0
                .send(Observed::Initial {
                    msg: error_msg.to_string(),
                    has_data: data.is_some(),
                    has_primary: context.is_some(),
                    collected: ids,
                })
                .unwrap();
        }
        fn error_occurred(&mut self, _event: &VrtEvent, msg: &str) {
            self.0.send(Observed::Error(msg.to_string())).unwrap();
        }
    }

    fn recorder() -> (PacketDispatcher, mpsc::Receiver<Observed>) {
        dispatcher_with_timeout(None)
    }

    fn dispatcher_with_timeout(
        timeout: Option<Duration>,
    ) -> (PacketDispatcher, mpsc::Receiver<Observed>) {
        let (tx, rx) = mpsc::channel();
        (
            PacketDispatcher::new(Box::new(Recorder(tx)), "test".into(), timeout),
            rx,
        )
    }

    fn data_packet(stream_id: u32, count: u8) -> Vrt {
        let mut p = Vrt::new_signal_data_packet();
        p.set_stream_id(Some(stream_id));
        p.set_signal_payload(&[0; 4]).unwrap();
        p.header_mut().set_packet_count(count);
        p.update_packet_size();
        p
    }

    fn context_packet(stream_id: u32) -> Vrt {
        context_packet_with_count(stream_id, 0)
    }

    fn context_packet_with_count(stream_id: u32, count: u8) -> Vrt {
        let mut p = Vrt::new_context_packet();
        p.set_stream_id(Some(stream_id));
        p.header_mut().set_packet_count(count);
        p.update_packet_size();
        p
    }

    #[test]
    fn missed_packet_detection() {
        let (mut dispatcher, rx) = recorder();
        for count in [0u8, 1, 2, 4, 5] {
            dispatcher.handle_packet(data_packet(1, count));
        }
        let observed: Vec<Observed> = rx.try_iter().collect();
        let errors: Vec<&Observed> = observed
            .iter()
            .filter(|o| matches!(o, Observed::Error(_)))
            .collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0],
            &Observed::Error("Missed packets 3 (inclusive) to 4 (exclusive).".into())
        );
        // Legacy mode also delivered every packet.
        assert_eq!(
            observed
                .iter()
                .filter(|o| matches!(o, Observed::Packet))
                .count(),
            5
        );
    }

    #[test]
    fn separate_streams_count_independently() {
        let (mut dispatcher, rx) = recorder();
        dispatcher.handle_packet(data_packet(1, 0));
        dispatcher.handle_packet(data_packet(2, 7));
        dispatcher.handle_packet(data_packet(1, 1));
        dispatcher.handle_packet(data_packet(2, 8));
        assert!(rx
            .try_iter()
            .all(|o| !matches!(o, Observed::Error(_))));
    }

    #[test]
    fn missed_frame_detection() {
        let (mut dispatcher, rx) = recorder();
        dispatcher.handle_frame(100);
        dispatcher.handle_frame(101);
        dispatcher.handle_frame(103);
        let errors: Vec<Observed> = rx.try_iter().collect();
        assert_eq!(
            errors,
            vec![Observed::Error(
                "Missed frames 102 (inclusive) to 103 (exclusive).".into()
            )]
        );
    }

    #[test]
    fn frame_counter_wraps() {
        let (mut dispatcher, rx) = recorder();
        dispatcher.handle_frame(4095);
        dispatcher.handle_frame(0);
        assert!(rx.try_iter().next().is_none());
    }

    #[test]
    fn initial_context_completes_on_association_match() {
        let (mut dispatcher, rx) = dispatcher_with_timeout(Some(Duration::from_secs(60)));

        // Data stream 1 nominates the primary. The context for stream
        // 1 shares its counter, so the counts interleave.
        dispatcher.handle_packet(data_packet(1, 0));
        // The primary context names streams 10 and 20 as required.
        let mut primary = Vrt::new_context_packet();
        primary.set_stream_id(Some(1));
        primary.header_mut().set_packet_count(1);
        {
            let context = primary.payload_mut().context_mut().unwrap();
            let mut lists = crate::ContextAssociationLists::default();
            lists.set_source_list(vec![10]);
            lists.set_system_list(vec![20]);
            context.set_context_association_lists(Some(lists));
        }
        primary.update_packet_size();
        dispatcher.handle_packet(primary);
        assert!(rx.try_iter().next().is_none(), "still collecting");

        dispatcher.handle_packet(context_packet(10));
        assert!(rx.try_iter().next().is_none());
        dispatcher.handle_packet(context_packet(20));

        match rx.try_recv().unwrap() {
            Observed::Initial {
                msg,
                has_data,
                has_primary,
                collected,
            } => {
                assert!(msg.is_empty(), "unexpected message: {msg}");
                assert!(has_data);
                assert!(has_primary);
                assert_eq!(collected, vec![1, 10, 20]);
            }
            other => panic!("unexpected observation: {other:?}"),
        }

        // Later packets route to the typed callbacks.
        dispatcher.handle_packet(data_packet(1, 2));
        dispatcher.handle_packet(context_packet_with_count(1, 3));
        let tail: Vec<Observed> = rx.try_iter().collect();
        assert_eq!(tail, vec![Observed::Data(1), Observed::Context(1)]);
    }

    #[test]
    fn initial_context_timeout_without_data() {
        let (mut dispatcher, rx) = dispatcher_with_timeout(Some(Duration::from_millis(50)));
        dispatcher.handle_packet(context_packet(1));
        dispatcher.handle_packet(context_packet(2));
        dispatcher.handle_packet(context_packet(3));
        assert!(rx.try_iter().next().is_none());

        std::thread::sleep(Duration::from_millis(80));
        dispatcher.handle_packet(context_packet(4));
        match rx.try_recv().unwrap() {
            Observed::Initial {
                msg,
                has_data,
                has_primary,
                collected,
            } => {
                assert_eq!(msg, NO_DATA_STREAM);
                assert!(!has_data);
                assert!(!has_primary);
                assert_eq!(collected, vec![1, 2, 3, 4]);
            }
            other => panic!("unexpected observation: {other:?}"),
        }
    }

    #[test]
    fn initial_context_timeout_without_context() {
        let (mut dispatcher, rx) = dispatcher_with_timeout(Some(Duration::from_millis(50)));
        dispatcher.handle_packet(data_packet(1, 0));
        std::thread::sleep(Duration::from_millis(80));
        dispatcher.handle_packet(data_packet(1, 1));
        match rx.try_recv().unwrap() {
            Observed::Initial { msg, .. } => assert_eq!(msg, NO_CONTEXT_STREAM),
            other => panic!("unexpected observation: {other:?}"),
        }
    }

    #[test]
    fn unidentified_data_stream_completes_immediately() {
        let (mut dispatcher, rx) = dispatcher_with_timeout(Some(Duration::from_secs(60)));
        let mut p = Vrt::new_signal_data_packet();
        p.set_stream_id(None);
        p.update_packet_size();
        dispatcher.handle_packet(p);
        match rx.try_recv().unwrap() {
            Observed::Initial { msg, collected, .. } => {
                assert!(msg.is_empty());
                assert!(collected.is_empty());
            }
            other => panic!("unexpected observation: {other:?}"),
        }
    }

    #[test]
    fn queue_purges_oldest_quarter() {
        let queue = PacketQueue::new(8, true);
        for i in 0..10 {
            queue.push(QueueItem::FrameBoundary(i));
        }
        // Two purges of 2 items each happened along the way.
        assert!(queue.len() <= 8);
        match queue.pop(Duration::from_millis(1)).unwrap() {
            QueueItem::FrameBoundary(n) => assert!(n > 0),
            other => panic!("unexpected item: {other:?}"),
        }
    }

    #[test]
    fn queue_pop_times_out() {
        let queue = PacketQueue::new(4, false);
        assert!(queue.pop(Duration::from_millis(10)).is_none());
    }
}
