//! Tail-call dispatch table: maps the small integer slot passed to
//! `tail_call_internal` to the program that lives in that slot.
//!
//! The mapping is domain knowledge, not something recoverable from the IR, so
//! it is supplied as an explicit value. [`TailCallTable::cilium`] carries the
//! built-in slot assignments.

use std::collections::BTreeMap;

/// Slot numbers from the datapath's `CILIUM_CALL_*` definitions. Several
/// logical slots share a number (e.g. the netdev and overlay entry points
/// reuse the lxc slot).
pub mod slots {
    pub const DROP_NOTIFY: u32 = 1;
    pub const ERROR_NOTIFY: u32 = 2;
    pub const HANDLE_ICMP6_NS: u32 = 4;
    pub const SEND_ICMP6_TIME_EXCEEDED: u32 = 5;
    pub const ARP: u32 = 6;
    pub const IPV4_FROM_LXC: u32 = 7;
    pub const IPV4_FROM_NETDEV: u32 = IPV4_FROM_LXC;
    pub const IPV4_FROM_OVERLAY: u32 = IPV4_FROM_LXC;
    pub const IPV46_RFC8215: u32 = 8;
    pub const IPV64_RFC8215: u32 = 9;
    pub const IPV6_FROM_LXC: u32 = 10;
    pub const IPV6_FROM_NETDEV: u32 = IPV6_FROM_LXC;
    pub const IPV6_FROM_OVERLAY: u32 = IPV6_FROM_LXC;
    pub const IPV4_TO_LXC_POLICY_ONLY: u32 = 11;
    pub const IPV4_TO_HOST_POLICY_ONLY: u32 = IPV4_TO_LXC_POLICY_ONLY;
    pub const IPV6_TO_LXC_POLICY_ONLY: u32 = 12;
    pub const IPV6_TO_HOST_POLICY_ONLY: u32 = IPV6_TO_LXC_POLICY_ONLY;
    pub const IPV4_TO_ENDPOINT: u32 = 13;
    pub const IPV6_TO_ENDPOINT: u32 = 14;
    pub const IPV4_NODEPORT_NAT_EGRESS: u32 = 15;
    pub const IPV6_NODEPORT_NAT_EGRESS: u32 = 16;
    pub const IPV4_NODEPORT_REVNAT: u32 = 17;
    pub const IPV6_NODEPORT_REVNAT: u32 = 18;
    pub const IPV4_NODEPORT_NAT_FWD: u32 = 19;
    pub const IPV4_NODEPORT_DSR: u32 = 20;
    pub const IPV6_NODEPORT_DSR: u32 = 21;
    pub const IPV4_FROM_HOST: u32 = 22;
    pub const IPV6_FROM_HOST: u32 = 23;
    pub const IPV6_NODEPORT_NAT_FWD: u32 = 24;
    pub const IPV4_FROM_LXC_CONT: u32 = 25;
    pub const IPV6_FROM_LXC_CONT: u32 = 26;
    pub const IPV4_CT_INGRESS: u32 = 27;
    pub const IPV4_CT_INGRESS_POLICY_ONLY: u32 = 28;
    pub const IPV4_CT_EGRESS: u32 = 29;
    pub const IPV6_CT_INGRESS: u32 = 30;
    pub const IPV6_CT_INGRESS_POLICY_ONLY: u32 = 31;
    pub const IPV6_CT_EGRESS: u32 = 32;
    pub const SRV6_ENCAP: u32 = 33;
    pub const SRV6_DECAP: u32 = 34;
    // 35 (SRV6_REPLY) is unused.
    pub const IPV4_NODEPORT_NAT_INGRESS: u32 = 36;
    pub const IPV6_NODEPORT_NAT_INGRESS: u32 = 37;
    pub const IPV4_NODEPORT_SNAT_FWD: u32 = 38;
    pub const IPV6_NODEPORT_SNAT_FWD: u32 = 39;
    // 40 and 41 (NODEPORT_DSR_INGRESS) are unused.
    pub const IPV4_INTER_CLUSTER_REVSNAT: u32 = 42;
    pub const IPV4_CONT_FROM_HOST: u32 = 43;
    pub const IPV4_CONT_FROM_NETDEV: u32 = 44;
    pub const IPV6_CONT_FROM_HOST: u32 = 45;
    pub const IPV6_CONT_FROM_NETDEV: u32 = 46;
    pub const IPV4_NO_SERVICE: u32 = 47;
    pub const IPV6_NO_SERVICE: u32 = 48;
    pub const MULTICAST_EP_DELIVERY: u32 = 49;
    pub const SIZE: u32 = 50;
}

/// Index -> canonical program name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TailCallTable {
    entries: BTreeMap<u32, String>,
}

impl TailCallTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (u32, S)>,
        S: Into<String>,
    {
        Self { entries: entries.into_iter().map(|(k, v)| (k, v.into())).collect() }
    }

    /// Name of the program in slot `index`, if the slot is known.
    pub fn lookup(&self, index: u32) -> Option<&str> {
        self.entries.get(&index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Built-in slot assignments, collected from the `section_tail(...,
    /// CILIUM_CALL_*)` declarations. `ERROR_NOTIFY` has no program and is
    /// left out.
    pub fn cilium() -> Self {
        use slots::*;
        Self::from_entries([
            (DROP_NOTIFY, "__send_drop_notify"),
            (HANDLE_ICMP6_NS, "tail_icmp6_handle_ns"),
            (SEND_ICMP6_TIME_EXCEEDED, "tail_icmp6_send_time_exceeded"),
            (ARP, "tail_handle_arp"),
            (IPV4_FROM_LXC, "tail_handle_ipv4"),
            (IPV46_RFC8215, "tail_nat_ipv46"),
            (IPV64_RFC8215, "tail_nat_ipv64"),
            (IPV6_FROM_LXC, "tail_handle_ipv6"),
            (IPV4_TO_LXC_POLICY_ONLY, "tail_ipv4_policy"),
            (IPV6_TO_LXC_POLICY_ONLY, "tail_ipv6_policy"),
            (IPV4_TO_ENDPOINT, "tail_ipv4_to_endpoint"),
            (IPV6_TO_ENDPOINT, "tail_ipv6_to_endpoint"),
            (IPV4_NODEPORT_NAT_EGRESS, "tail_nodeport_nat_egress_ipv4"),
            (IPV6_NODEPORT_NAT_EGRESS, "tail_nodeport_nat_egress_ipv6"),
            (IPV4_NODEPORT_REVNAT, "tail_nodeport_rev_dnat_ingress_ipv4"),
            (IPV6_NODEPORT_REVNAT, "tail_nodeport_rev_dnat_ingress_ipv6"),
            (IPV4_NODEPORT_NAT_FWD, "tail_handle_nat_fwd_ipv4"),
            (IPV4_NODEPORT_DSR, "tail_nodeport_ipv4_dsr"),
            (IPV6_NODEPORT_DSR, "tail_nodeport_ipv6_dsr"),
            (IPV4_FROM_HOST, "tail_handle_ipv4_from_host"),
            (IPV6_FROM_HOST, "tail_handle_ipv6_from_host"),
            (IPV6_NODEPORT_NAT_FWD, "tail_handle_nat_fwd_ipv6"),
            (IPV4_FROM_LXC_CONT, "tail_handle_ipv4_cont"),
            (IPV6_FROM_LXC_CONT, "tail_handle_ipv6_cont"),
            (IPV4_CT_INGRESS, "tail_ipv4_ct_ingress"),
            (IPV4_CT_INGRESS_POLICY_ONLY, "tail_ipv4_ct_ingress_policy_only"),
            (IPV4_CT_EGRESS, "tail_ipv4_ct_egress"),
            (IPV6_CT_INGRESS, "tail_ipv6_ct_ingress"),
            (IPV6_CT_INGRESS_POLICY_ONLY, "tail_ipv6_ct_ingress_policy_only"),
            (IPV6_CT_EGRESS, "tail_ipv6_ct_egress"),
            (SRV6_ENCAP, "tail_srv6_encap"),
            (SRV6_DECAP, "tail_srv6_decap"),
            (IPV4_NODEPORT_NAT_INGRESS, "tail_nodeport_nat_ingress_ipv4"),
            (IPV6_NODEPORT_NAT_INGRESS, "tail_nodeport_nat_ingress_ipv6"),
            (IPV4_NODEPORT_SNAT_FWD, "tail_handle_snat_fwd_ipv4"),
            (IPV6_NODEPORT_SNAT_FWD, "tail_handle_snat_fwd_ipv6"),
            (IPV4_INTER_CLUSTER_REVSNAT, "tail_handle_inter_cluster_revsnat"),
            (IPV4_CONT_FROM_HOST, "tail_handle_ipv4_cont_from_host"),
            (IPV4_CONT_FROM_NETDEV, "tail_handle_ipv4_from_netdev"),
            (IPV6_CONT_FROM_HOST, "tail_handle_ipv6_cont_from_host"),
            (IPV6_CONT_FROM_NETDEV, "tail_handle_ipv6_from_netdev"),
            (IPV4_NO_SERVICE, "tail_no_service_ipv4"),
            (IPV6_NO_SERVICE, "tail_no_service_ipv6"),
            (MULTICAST_EP_DELIVERY, "tail_mcast_ep_delivery"),
        ])
    }
}
