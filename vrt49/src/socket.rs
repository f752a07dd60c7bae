// SPDX-FileCopyrightText: 2025 The vrt49 Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
/*!
Multicast UDP socket setup for the receive pipeline.

`SO_REUSEADDR` and the receive buffer size have to be applied before
the bind, which std's `UdpSocket` can't express, so the socket is
created through libc and handed to std afterwards.
*/
#![allow(unsafe_code)]

use std::io;
use std::net::{Ipv4Addr, UdpSocket};
use std::os::fd::FromRawFd;
use std::time::Duration;

use crate::VitaError;

/// Receive poll interval: both reader threads wake at this rate to
/// check the stop flag.
pub const RECV_TIMEOUT: Duration = Duration::from_millis(100);

const fn to_in_addr(addr: &Ipv4Addr) -> libc::in_addr {
    libc::in_addr {
        s_addr: u32::from_ne_bytes(addr.octets()),
    }
}

fn setsockopt<T>(
    sock: libc::c_int,
    level: libc::c_int,
    name: libc::c_int,
    data: T,
) -> Result<(), VitaError> {
    let data_ptr: *const libc::c_void = &data as *const _ as *const libc::c_void;
    let ret = unsafe {
        libc::setsockopt(
            sock,
            level,
            name,
            data_ptr,
            std::mem::size_of::<T>() as libc::socklen_t,
        )
    };
    if ret != 0 {
        return Err(VitaError::SocketSetup(format!(
            "setsockopt failed: {}",
            io::Error::last_os_error()
        )));
    }
    Ok(())
}

/// A UDP socket bound to a multicast group with `SO_REUSEADDR`, a
/// sized receive buffer, group membership on the chosen interface, and
/// a 100 ms read timeout.
pub struct MulticastSocket {
    sock: UdpSocket,
    group: Ipv4Addr,
    interface: Ipv4Addr,
}

impl MulticastSocket {
    /// Opens the socket and joins `group` on `interface`
    /// (`0.0.0.0` lets the kernel pick).
    ///
    /// # Errors
    /// Any failure to create, configure, bind, or join terminates
    /// construction.
    pub fn open(
        group: Ipv4Addr,
        port: u16,
        interface: Ipv4Addr,
        recv_buf_size: usize,
    ) -> Result<MulticastSocket, VitaError> {
        let fd = unsafe { libc::socket(libc::AF_INET, libc::SOCK_DGRAM, 0) };
        if fd < 0 {
            return Err(VitaError::SocketSetup(format!(
                "socket creation failed: {}",
                io::Error::last_os_error()
            )));
        }

        setsockopt(fd, libc::SOL_SOCKET, libc::SO_REUSEADDR, 1 as libc::c_int)?;
        if recv_buf_size > 0 {
            setsockopt(fd, libc::SOL_SOCKET, libc::SO_RCVBUF, recv_buf_size as libc::c_int)?;
        }

        let sockaddr = libc::sockaddr_in {
            sin_family: libc::AF_INET as libc::sa_family_t,
            sin_port: port.to_be(),
            sin_addr: to_in_addr(&group),
            sin_zero: [0; 8],
        };
        let sockaddr_ptr = &sockaddr as *const libc::sockaddr_in as *const libc::sockaddr;
        let ret = unsafe {
            libc::bind(
                fd,
                sockaddr_ptr,
                std::mem::size_of::<libc::sockaddr_in>() as libc::socklen_t,
            )
        };
        if ret != 0 {
            let err = io::Error::last_os_error();
            unsafe { libc::close(fd) };
            return Err(VitaError::SocketSetup(format!("bind failed: {err}")));
        }

        let sock = unsafe { UdpSocket::from_raw_fd(fd) };
        sock.set_read_timeout(Some(RECV_TIMEOUT))
            .map_err(|e| VitaError::SocketSetup(format!("set_read_timeout failed: {e}")))?;

        if group.is_multicast() {
            sock.join_multicast_v4(&group, &interface).map_err(|e| {
                VitaError::SocketSetup(format!("multicast join {group} on {interface} failed: {e}"))
            })?;
            log::debug!("joined multicast group {group} on interface {interface}");
        }

        Ok(MulticastSocket {
            sock,
            group,
            interface,
        })
    }

    /// Receives one datagram. Timeouts surface as
    /// `ErrorKind::WouldBlock`/`TimedOut`.
    pub fn recv(&self, buf: &mut [u8]) -> io::Result<usize> {
        self.sock.recv(buf)
    }
}

impl Drop for MulticastSocket {
    fn drop(&mut self) {
        if self.group.is_multicast() {
            self.sock
                .leave_multicast_v4(&self.group, &self.interface)
                .ok();
        }
    }
}
