//! Syntactic validation of IPv4 and IPv6 literals.
//!
//! These checks gate configuration values that will be used as a listener
//! bind address. They are purely syntactic: no hostname resolution and no
//! checks on reserved or routable ranges.

/// Maximum number of 16-bit groups in an IPv6 address.
const IPV6_GROUPS: usize = 8;

/// Check whether `addr` is a valid IPv4 or IPv6 literal.
///
/// # Example
///
/// ```rust
/// use bootconf::is_valid_ip;
///
/// assert!(is_valid_ip("127.0.0.1"));
/// assert!(is_valid_ip("::1"));
/// assert!(!is_valid_ip("127. 0.0.1"));
/// ```
pub fn is_valid_ip(addr: &str) -> bool {
    is_valid_ipv4(addr) || is_valid_ipv6(addr)
}

/// Check whether `addr` is a dotted-quad IPv4 literal.
///
/// Exactly four groups of one to three ASCII digits, each at most 255.
pub fn is_valid_ipv4(addr: &str) -> bool {
    let mut groups = 0;
    for group in addr.split('.') {
        groups += 1;
        if groups > 4 || !is_ipv4_octet(group) {
            return false;
        }
    }
    groups == 4
}

fn is_ipv4_octet(group: &str) -> bool {
    if group.is_empty() || group.len() > 3 || !group.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    group.parse::<u16>().map(|v| v <= 255).unwrap_or(false)
}

/// Check whether `addr` is a colon-hex IPv6 literal.
///
/// Up to eight groups of one to four hex digits with at most one `::`
/// standing in for one or more all-zero groups. Embedded IPv4 suffixes
/// are not accepted.
pub fn is_valid_ipv6(addr: &str) -> bool {
    match addr.find("::") {
        None => count_ipv6_groups(addr) == Some(IPV6_GROUPS),
        Some(pos) => {
            let (head, tail) = (&addr[..pos], &addr[pos + 2..]);
            if tail.contains("::") {
                return false;
            }
            match (count_ipv6_groups(head), count_ipv6_groups(tail)) {
                // `::` must replace at least one group.
                (Some(h), Some(t)) => h + t < IPV6_GROUPS,
                _ => false,
            }
        }
    }
}

/// Count the groups in a `:`-separated run of hex groups.
///
/// An empty run has zero groups. Returns `None` on any malformed group.
fn count_ipv6_groups(run: &str) -> Option<usize> {
    if run.is_empty() {
        return Some(0);
    }
    let mut count = 0;
    for group in run.split(':') {
        if group.is_empty() || group.len() > 4 || !group.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        count += 1;
    }
    Some(count)
}

/// Addresses every validator in the crate must accept.
#[cfg(test)]
pub(crate) const VALID_ADDRESSES: &[&str] = &[
    "127.0.0.1",
    "1.127.0.1",
    "1.1.127.1",
    "1.1.1.127",
    "::",
    "::1",
    "1200:0000:AB00:1234:0000:2552:7777:1313",
    "1200::AB00:1234:0000:2552:7777:1313",
    "1200:0000:AB00:1234::2552:7777:1313",
    "21DA:D3:0:2F3B:2AA:FF:FE28:9C5A",
    "FE80:0000:0000:0000:0202:B3FF:FE1E:8329",
    "0.0.0.0",
    "9.255.255.255",
    "11.0.0.0",
    "126.255.255.255",
    "129.0.0.0",
    "169.253.255.255",
    "169.255.0.0",
    "172.15.255.255",
    "172.32.0.0",
    "191.0.1.255",
    "192.88.98.255",
    "192.88.100.0",
    "192.167.255.255",
    "192.169.0.0",
    "198.17.255.255",
    "223.255.255.255",
];

/// Addresses every validator in the crate must reject.
#[cfg(test)]
pub(crate) const INVALID_ADDRESSES: &[&str] = &[
    "327.0.0.1",
    "1.327.0.1",
    "1.1.327.1",
    "1.1.1.327",
    "12 7.0.0.1",
    "127. 0.0.1",
    "127.0. 0.1",
    "127.0.0. 1",
    "!27.0.0.1",
    "1200: 0000:AB00:1234:0000:2552:7777:1313",
    "1200:0000: AB00:1234:0000:2552:7777:1313",
    "1200:0000:AB00: 1234:0000:2552:7777:1313",
    "1200:0000:AB00:1234: 0000:2552:7777:1313",
    "1200:0000:AB00:1234:0000: 2552:7777:1313",
    "1200:0000:AB00:1234:0000:2552: 7777:1313",
    "1200:0000:AB00:1234:0000:2552:7777: 1313",
    "1200:0000:AB00:1234:0000:2552:7777:131G",
    "1200:0000:AB00:1234:0000:2552:77Z7:1313",
    "1200:0000:AB00:1234:0000:2G52:7777:1313",
    "1200:0000:AB00:1234:0O00:2552:7777:1313",
    "1200:0000:AB00:H234:0000:2552:7777:1313",
    "1200:0000:IB00:1234:0000:2552:7777:1313",
    "1200:0O00:AB00:1234:0000:2552:7777:1313",
    "12O0:0000:AB00:1234:0000:2552:7777:1313",
];
