//! Module `commands`
//!
//! Formats the commands the client writes to the control connection.

use std::net::{IpAddr, SocketAddr};

use crate::error::TransferError;

/// Formats `EPRT |<proto>|<ip>|<port>|` (RFC 2428).
///
/// Network protocol 1 is IPv4, 2 is IPv6.
pub fn format_eprt(endpoint: &SocketAddr) -> String {
    let proto = match endpoint.ip() {
        IpAddr::V4(_) => 1,
        IpAddr::V6(_) => 2,
    };
    format!("EPRT |{}|{}|{}|", proto, endpoint.ip(), endpoint.port())
}

/// Formats `PORT h1,h2,h3,h4,p1,p2` (RFC 959). IPv4 only.
pub fn format_port(endpoint: &SocketAddr) -> Result<String, TransferError> {
    let ip = match endpoint.ip() {
        IpAddr::V4(ip) => ip,
        IpAddr::V6(_) => return Err(TransferError::UnsupportedAddress(*endpoint)),
    };
    let port = endpoint.port();
    Ok(format!(
        "PORT {},{},{}",
        ip.to_string().replace('.', ","),
        port / 256,
        port % 256
    ))
}

/// Renders a command for the log, hiding the password argument.
pub fn redact(command: &str) -> &str {
    if command
        .get(..4)
        .is_some_and(|verb| verb.eq_ignore_ascii_case("PASS"))
    {
        "PASS ****"
    } else {
        command
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_eprt_ipv4() {
        let addr: SocketAddr = "127.0.0.1:4660".parse().unwrap();
        assert_eq!(format_eprt(&addr), "EPRT |1|127.0.0.1|4660|");
    }

    #[test]
    fn test_format_eprt_ipv6() {
        let addr: SocketAddr = "[::1]:2121".parse().unwrap();
        assert_eq!(format_eprt(&addr), "EPRT |2|::1|2121|");
    }

    #[test]
    fn test_format_port_splits_bytes() {
        let addr: SocketAddr = "127.0.0.1:4660".parse().unwrap();
        assert_eq!(format_port(&addr).unwrap(), "PORT 127,0,0,1,18,52");

        let addr: SocketAddr = "192.168.10.200:65535".parse().unwrap();
        assert_eq!(format_port(&addr).unwrap(), "PORT 192,168,10,200,255,255");

        let addr: SocketAddr = "10.0.0.1:255".parse().unwrap();
        assert_eq!(format_port(&addr).unwrap(), "PORT 10,0,0,1,0,255");
    }

    #[test]
    fn test_format_port_rejects_ipv6() {
        let addr: SocketAddr = "[::1]:2121".parse().unwrap();
        assert!(matches!(
            format_port(&addr),
            Err(TransferError::UnsupportedAddress(_))
        ));
    }

    #[test]
    fn test_redact() {
        assert_eq!(redact("PASS hunter2"), "PASS ****");
        assert_eq!(redact("pass hunter2"), "PASS ****");
        assert_eq!(redact("USER anonymous"), "USER anonymous");
        assert_eq!(redact("LIST"), "LIST");
    }
}
