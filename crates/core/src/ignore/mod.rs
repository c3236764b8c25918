//! Ignore lists: symbol names and `@group` aliases flattened into a set.
//!
//! Aliases expand depth-first and may refer to other aliases. Expansion keeps
//! the chain of aliases currently being expanded and fails on a repeat, so a
//! cyclic definition is reported instead of looping forever.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

/// Prefix marking an alias token.
pub const ALIAS_SIGIL: char = '@';

/// Alias used when the caller gives no ignore list.
pub const DEFAULT_ALIAS: &str = "@default";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IgnoreError {
    #[error("fn list {0:?} does not exist")]
    UnknownAlias(String),
    #[error("fn list {alias:?} refers to itself via {}", .chain.join(" -> "))]
    AliasCycle { alias: String, chain: Vec<String> },
}

pub fn is_alias(token: &str) -> bool {
    token.starts_with(ALIAS_SIGIL)
}

/// Registered alias -> members table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    groups: BTreeMap<String, Vec<String>>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) an alias. `alias` must carry the sigil.
    pub fn insert<I, S>(&mut self, alias: impl Into<String>, members: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups.insert(alias.into(), members.into_iter().map(Into::into).collect());
        self
    }

    /// Overlay `other` on top of this table; its aliases win.
    pub fn merge(&mut self, other: &AliasTable) -> &mut Self {
        for (alias, members) in &other.groups {
            self.groups.insert(alias.clone(), members.clone());
        }
        self
    }

    pub fn get(&self, alias: &str) -> Option<&[String]> {
        self.groups.get(alias).map(Vec::as_slice)
    }

    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Flatten `names` into literal symbol names, in expansion order.
    pub fn expand<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<String>, IgnoreError> {
        let mut out = Vec::new();
        let mut active = Vec::new();
        for name in names {
            self.expand_into(name.as_ref(), &mut active, &mut out)?;
        }
        Ok(out)
    }

    fn expand_into(
        &self,
        token: &str,
        active: &mut Vec<String>,
        out: &mut Vec<String>,
    ) -> Result<(), IgnoreError> {
        if !is_alias(token) {
            out.push(token.to_string());
            return Ok(());
        }
        if active.iter().any(|a| a == token) {
            let mut chain = active.clone();
            chain.push(token.to_string());
            return Err(IgnoreError::AliasCycle { alias: token.to_string(), chain });
        }
        let members =
            self.groups.get(token).ok_or_else(|| IgnoreError::UnknownAlias(token.to_string()))?;
        active.push(token.to_string());
        for member in members {
            self.expand_into(member, active, out)?;
        }
        active.pop();
        Ok(())
    }

    /// Built-in groups of datapath helpers that clutter call graphs.
    pub fn builtin() -> Self {
        let mut table = Self::new();
        table
            .insert(
                DEFAULT_ALIAS,
                [
                    "@bpf", "@builtins", "@cildbg", "@ctx", "@eth", "@ipv4", "@lb", "@metrics",
                    "@srv6", "@utils",
                ],
            )
            .insert("@bpf", ["__bpf_memcpy", "bpf_barrier", "bpf_clear_meta"])
            .insert("@builtins", ["llvm", "memcpy", "memset"])
            .insert("@cildbg", ["cilium_dbg", "cilium_dbg3", "cilium_dbg_capture", "cilium_capture_out"])
            .insert(
                "@ctx",
                [
                    "ctx_change_head",
                    "ctx_data_end",
                    "ctx_data_start",
                    "ctx_data",
                    "ctx_full_len",
                    "ctx_get_ifindex",
                    "ctx_get_protocol",
                    "ctx_is_skb",
                    "ctx_load_and_clear_meta",
                    "ctx_load_meta",
                    "ctx_redirect",
                    "ctx_set_encap_info",
                    "ctx_store_meta",
                ],
            )
            .insert(
                "@eth",
                [
                    "eth_addrcmp",
                    "eth_is_bcast",
                    "eth_is_supported_ethertype",
                    "eth_load_saddr",
                    "eth_store_saddr_aligned",
                    "eth_store_saddr",
                    "eth_load_daddr",
                    "eth_store_daddr_aligned",
                    "eth_store_daddr",
                    "eth_store_proto",
                ],
            )
            .insert(
                "@lb",
                [
                    "lb4_svc_is_affinity",
                    "lb4_update_affinity_by_addr",
                    "lb4_fill_key",
                    "lb4_lookup_service",
                    "lb4_affinity_backend_id_by_addr",
                    "lb4_lookup_backend",
                ],
            )
            .insert("@ipv4", ["ipv4_has_l4_header", "ipv4_hdrlen", "ipv4_load_l4_ports"])
            .insert("@metrics", ["_send_trace_notify", "_update_metrics"])
            .insert(
                "@utils",
                [
                    "__id_for_file",
                    "__revalidate_data_pull",
                    "csum_diff",
                    "csum_l4_replace",
                    "ipv6_addr_copy",
                    "_utime_get_offset",
                    "utime_get_time",
                    "is_valid_lxc_src_ipv4",
                ],
            )
            .insert(
                "@srv6",
                [
                    "srv6_lookup_vrf4",
                    "srv6_lookup_policy4",
                    "srv6_lookup_vrf6",
                    "srv6_lookup_policy6",
                    "srv6_lookup_sid",
                    "srv6_encapsulation",
                    "srv6_decapsulation",
                    "srv6_handling4",
                    "srv6_handling6",
                    "srv6_handling",
                    "srv6_load_meta_sid",
                    "srv6_store_meta_sid",
                ],
            );
        table
    }
}

/// Flat set of ignored symbol names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreSet {
    names: BTreeSet<String>,
}

impl IgnoreSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expand `names` through `aliases` into a set.
    pub fn build<S: AsRef<str>>(names: &[S], aliases: &AliasTable) -> Result<Self, IgnoreError> {
        Ok(aliases.expand(names)?.into_iter().collect())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl FromIterator<String> for IgnoreSet {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Self { names: iter.into_iter().collect() }
    }
}
