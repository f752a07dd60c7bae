// SPDX-FileCopyrightText: 2025 The vrt49 Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
/*!
Packet factory: maps parsed packets onto their best-fit concrete views.

A factory chain is a list of boxed [`PacketFactory`] trait objects
tried in order; the built-in [`DefaultPacketFactory`] always resolves,
so a chain with it at the tail never fails to classify. Applications
insert their own factories ahead of it to intercept class IDs they
know about.
*/

use crate::packet_header::PacketType;
use crate::standard_data::{self, StandardDataPacket};
use crate::vrt::Vrt;

/// A packet dispatched to its concrete interpretation.
#[derive(Clone, Debug)]
pub enum AnyPacket {
    /// A signal data packet with a standard data class ID.
    StandardData(StandardDataPacket),
    /// A signal data or extension data packet.
    SignalData(Vrt),
    /// A context packet.
    Context(Vrt),
    /// An extension context packet, exposed as a generic packet.
    ExtensionContext(Vrt),
    /// A command packet (control/cancellation/ACK family).
    Command(Vrt),
}

impl AnyPacket {
    /// Borrows the underlying packet regardless of classification.
    pub fn as_vrt(&self) -> &Vrt {
        match self {
            AnyPacket::StandardData(p) => p,
            AnyPacket::SignalData(p)
            | AnyPacket::Context(p)
            | AnyPacket::ExtensionContext(p)
            | AnyPacket::Command(p) => p,
        }
    }

    /// Consumes the classification, returning the underlying packet.
    pub fn into_vrt(self) -> Vrt {
        match self {
            AnyPacket::StandardData(p) => p.into_inner(),
            AnyPacket::SignalData(p)
            | AnyPacket::Context(p)
            | AnyPacket::ExtensionContext(p)
            | AnyPacket::Command(p) => p,
        }
    }
}

/// A pluggable packet classifier. Returning `None` passes the packet
/// to the next factory in the chain.
pub trait PacketFactory: Send + Sync {
    /// Attempts to classify the packet.
    fn wrap(&self, packet: Vrt) -> Result<AnyPacket, Vrt>;
}

/// The built-in classification: standard data class IDs first, then
/// dispatch by packet type.
#[derive(Default, Debug, Clone, Copy)]
pub struct DefaultPacketFactory;

impl PacketFactory for DefaultPacketFactory {
    fn wrap(&self, packet: Vrt) -> Result<AnyPacket, Vrt> {
        if let Some(id) = packet.class_id().map(|c| c.as_u64()) {
            // Reserved data type codes fall through to plain data.
            if packet.header().packet_type().is_data()
                && standard_data::is_standard_data_class_id(id)
                && standard_data::payload_format_for_class(id).is_ok()
            {
                return Ok(AnyPacket::StandardData(
                    StandardDataPacket::from_vrt_unchecked(packet),
                ));
            }
        }
        Ok(match packet.header().packet_type() {
            PacketType::Context => AnyPacket::Context(packet),
            PacketType::ExtensionContext => AnyPacket::ExtensionContext(packet),
            PacketType::Command | PacketType::ExtensionCommand => AnyPacket::Command(packet),
            _ => AnyPacket::SignalData(packet),
        })
    }
}

/// An ordered chain of factories ending in the default dispatch.
pub struct PacketFactoryChain {
    factories: Vec<Box<dyn PacketFactory>>,
}

impl Default for PacketFactoryChain {
    fn default() -> Self {
        PacketFactoryChain {
            factories: vec![Box::new(DefaultPacketFactory)],
        }
    }
}

impl PacketFactoryChain {
    /// Creates a chain holding only the default factory.
    pub fn new() -> PacketFactoryChain {
        PacketFactoryChain::default()
    }

    /// Inserts a factory ahead of everything currently in the chain.
    pub fn push_front(&mut self, factory: Box<dyn PacketFactory>) {
        self.factories.insert(0, factory);
    }

    /// Classifies a packet with the first factory that accepts it.
    pub fn wrap(&self, packet: Vrt) -> AnyPacket {
        let mut packet = packet;
        for factory in &self.factories {
            match factory.wrap(packet) {
                Ok(classified) => return classified,
                Err(p) => packet = p,
            }
        }
        // The default factory always classifies; reaching here means
        // the chain was built without it.
        AnyPacket::SignalData(packet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload_format::{DataType, RealComplexType};
    use crate::prelude::*;

    #[test]
    fn default_dispatch() {
        let chain = PacketFactoryChain::new();
        assert!(matches!(
            chain.wrap(Vrt::new_context_packet()),
            AnyPacket::Context(_)
        ));
        assert!(matches!(
            chain.wrap(Vrt::new_control_packet()),
            AnyPacket::Command(_)
        ));
        assert!(matches!(
            chain.wrap(Vrt::new_signal_data_packet()),
            AnyPacket::SignalData(_)
        ));
    }

    #[test]
    fn standard_data_takes_precedence() {
        let packet = crate::StandardDataPacket::new(
            DataType::Int16,
            RealComplexType::ComplexCartesian,
            0,
        )
        .unwrap()
        .into_inner();
        let chain = PacketFactoryChain::new();
        assert!(matches!(chain.wrap(packet), AnyPacket::StandardData(_)));
    }

    #[test]
    fn custom_factory_intercepts() {
        struct ContextGrabber;
        impl PacketFactory for ContextGrabber {
            fn wrap(&self, packet: Vrt) -> Result<AnyPacket, Vrt> {
                if packet.header().packet_type() == PacketType::Context {
                    Ok(AnyPacket::ExtensionContext(packet))
                } else {
                    Err(packet)
                }
            }
        }
        let mut chain = PacketFactoryChain::new();
        chain.push_front(Box::new(ContextGrabber));
        assert!(matches!(
            chain.wrap(Vrt::new_context_packet()),
            AnyPacket::ExtensionContext(_)
        ));
        assert!(matches!(
            chain.wrap(Vrt::new_signal_data_packet()),
            AnyPacket::SignalData(_)
        ));
    }
}
