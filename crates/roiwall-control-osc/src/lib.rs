//! roiwall-control-osc
//!
//! OSC control plane for plugin parameters: receive float messages over UDP and
//! route them to parameter indices by name or number.
//!
//! rosc 0.10.x API note:
//! - `rosc::decoder::decode_udp` returns `Result<(&[u8], OscPacket), _>` (nom-style),
//!   where the first tuple element is the *unconsumed remainder* of the buffer.

use std::collections::HashMap;
use std::io;
use std::net::{SocketAddr, UdpSocket};

use roiwall_plugins::{ParamInfo, Plugin};
use rosc::{OscPacket, OscType};

/// Non-blocking UDP OSC receiver that extracts parameter messages.
///
/// Convention:
/// - Address: "/param/<name>" or "/<name>"
/// - Value: first argument, coercible to f32 (Float, Double, Int, Long)
#[derive(Debug)]
pub struct OscParamReceiver {
    sock: UdpSocket,
    buf: [u8; 2048],
}

impl OscParamReceiver {
    /// Bind to an address like "127.0.0.1:9000" and put the socket in non-blocking mode.
    pub fn bind(addr: &str) -> io::Result<Self> {
        let sock = UdpSocket::bind(addr)?;
        sock.set_nonblocking(true)?;
        Ok(Self {
            sock,
            buf: [0u8; 2048],
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.sock.local_addr()
    }

    /// Poll the socket and return all parameter updates available right now.
    ///
    /// This never blocks; it drains the UDP socket until `WouldBlock`.
    pub fn poll(&mut self) -> Vec<(String, f32)> {
        let mut out: Vec<(String, f32)> = Vec::new();

        loop {
            match self.sock.recv_from(&mut self.buf) {
                Ok((n, from)) => match rosc::decoder::decode_udp(&self.buf[..n]) {
                    Ok((_rest, pkt)) => extract_from_packet(pkt, &mut out),
                    Err(e) => tracing::debug!(%from, error = ?e, "dropping undecodable OSC packet"),
                },
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(e) => {
                    tracing::debug!(error = %e, "OSC recv failed");
                    break;
                }
            }
        }

        out
    }
}

/// Walk a packet/bundle tree and push parsed param messages into `out`.
fn extract_from_packet(pkt: OscPacket, out: &mut Vec<(String, f32)>) {
    match pkt {
        OscPacket::Message(m) => {
            if let Some(kv) = parse_param_message(&m.addr, &m.args) {
                out.push(kv);
            }
        }
        OscPacket::Bundle(b) => {
            for p in b.content {
                extract_from_packet(p, out);
            }
        }
    }
}

/// Parse a message into a `(name, value)` pair if it matches our convention.
fn parse_param_message(addr: &str, args: &[OscType]) -> Option<(String, f32)> {
    let name = addr
        .strip_prefix("/param/")
        .or_else(|| addr.strip_prefix('/'))?;
    let v0 = args.first()?;
    let v = match *v0 {
        OscType::Float(x) => x,
        OscType::Double(x) => x as f32,
        OscType::Int(x) => x as f32,
        OscType::Long(x) => x as f32,
        _ => return None,
    };
    Some((name.to_string(), v))
}

/// `"Threshold Begin"` -> `"threshold_begin"`.
pub fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for word in name.split(|c: char| !c.is_ascii_alphanumeric()) {
        if word.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push('_');
        }
        out.push_str(&word.to_ascii_lowercase());
    }
    out
}

/// Maps OSC parameter names to a plugin's parameter indices.
///
/// A name resolves if it is the snake-case form of a parameter name or a
/// decimal index into the table.
#[derive(Debug, Clone)]
pub struct ParamRouter {
    by_name: HashMap<String, usize>,
    count: usize,
}

impl ParamRouter {
    pub fn for_params(params: &[ParamInfo]) -> Self {
        let by_name = params
            .iter()
            .enumerate()
            .map(|(i, p)| (snake_case(p.name), i))
            .collect();
        Self {
            by_name,
            count: params.len(),
        }
    }

    pub fn resolve(&self, name: &str) -> Option<usize> {
        if let Some(&i) = self.by_name.get(name) {
            return Some(i);
        }
        name.parse::<usize>().ok().filter(|&i| i < self.count)
    }

    /// Apply `updates` to `plugin`; returns how many were applied.
    pub fn apply(&self, plugin: &mut dyn Plugin, updates: &[(String, f32)]) -> usize {
        let mut applied = 0;
        for (name, value) in updates {
            let Some(index) = self.resolve(name) else {
                tracing::debug!(plugin = plugin.info().name, %name, "unknown OSC parameter");
                continue;
            };
            match plugin.set_param(index, *value) {
                Ok(()) => applied += 1,
                Err(e) => tracing::debug!(%name, error = %e, "OSC parameter rejected"),
            }
        }
        applied
    }
}
