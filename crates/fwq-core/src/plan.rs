//! Firmware query plan
//!
//! [`FwQueryConfig`] owns the query templates and the firmware database of a
//! brand and derives from them what the bus querying code needs:
//!
//! - the materialized request list, with auxiliary requests duplicated onto
//!   the auxiliary transport's buses,
//! - the address batches to query, physically addressed ECUs together in one
//!   parallel batch and every functionally addressed ECU in a batch of its own,
//! - the full set of addresses to listen for, and the ECU kind behind each.
//!
//! The config is immutable once built. Every derivation is recomputed on
//! call from the stored database.

use std::collections::{BTreeSet, HashMap};

use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use crate::ecu::{EcuAddress, EcuKind, EcuType, FwVersion};
use crate::request::Request;

/// Number of buses exposed by one panda
pub const BUSES_PER_PANDA: usize = 4;

/// Known firmware versions per ECU of one model
pub type EcuVersions = IndexMap<EcuType, Vec<FwVersion>>;

/// Known firmware versions per model, in insertion order
pub type FwVersionDb = IndexMap<String, EcuVersions>;

/// Address batches: the parallel batch first, then one singleton per
/// functionally addressed ECU
pub type AddressBatches = Vec<Vec<EcuAddress>>;

/// Firmware query configuration for one brand
#[derive(Debug, Clone, Default)]
pub struct FwQueryConfig {
    requests: Vec<Request>,
    non_essential_ecus: HashMap<EcuKind, BTreeSet<String>>,
    extra_ecus: Vec<EcuType>,
    fw_versions: FwVersionDb,
}

impl FwQueryConfig {
    /// Build a config, duplicating every auxiliary request onto `bus + 4`
    pub fn new(requests: Vec<Request>, fw_versions: FwVersionDb) -> Self {
        let requests = expand_auxiliary(requests);
        debug!(
            requests = requests.len(),
            models = fw_versions.len(),
            "Built firmware query config"
        );
        Self {
            requests,
            non_essential_ecus: HashMap::new(),
            extra_ecus: Vec::new(),
            fw_versions,
        }
    }

    /// Models on which the absence of an ECU kind is tolerated
    pub fn with_non_essential_ecus(
        mut self,
        non_essential_ecus: HashMap<EcuKind, BTreeSet<String>>,
    ) -> Self {
        self.non_essential_ecus = non_essential_ecus;
        self
    }

    /// ECUs queried for data collection only
    pub fn with_extra_ecus(mut self, extra_ecus: Vec<EcuType>) -> Self {
        self.extra_ecus = extra_ecus;
        self
    }

    /// All materialized requests, auxiliary duplicates included
    pub fn requests(&self) -> &[Request] {
        &self.requests
    }

    pub fn non_essential_ecus(&self) -> &HashMap<EcuKind, BTreeSet<String>> {
        &self.non_essential_ecus
    }

    pub fn extra_ecus(&self) -> &[EcuType] {
        &self.extra_ecus
    }

    pub fn fw_versions(&self) -> &FwVersionDb {
        &self.fw_versions
    }

    /// Model identifiers in database order
    pub fn models(&self) -> impl Iterator<Item = &str> {
        self.fw_versions.keys().map(String::as_str)
    }

    /// Known ECU versions of one model
    pub fn fw_versions_for(&self, model: &str) -> Option<&EcuVersions> {
        self.fw_versions.get(model)
    }

    /// Requests that can run with `num_pandas` pandas attached
    ///
    /// Each panda exposes four buses, so a request on bus `b` needs
    /// `b < num_pandas * 4`. Requests on the auxiliary buses are dropped when
    /// only one panda is present.
    pub fn materialized_requests(&self, num_pandas: usize) -> Vec<&Request> {
        let bus_count = num_pandas.saturating_mul(BUSES_PER_PANDA);
        self.requests
            .iter()
            .filter(|r| usize::from(r.bus) < bus_count)
            .collect()
    }

    /// Address batches for one request (or for all ECUs when `filter` is `None`)
    ///
    /// The first batch holds every physically addressed ECU and is always
    /// present, possibly empty. Each following batch holds exactly one
    /// functionally addressed ECU. No address appears twice.
    pub fn address_batches(&self, filter: Option<&Request>) -> AddressBatches {
        let mut parallel: IndexSet<EcuAddress> = IndexSet::new();
        let mut functional: IndexSet<EcuAddress> = IndexSet::new();

        for ecu in self.ecus() {
            if let Some(request) = filter {
                if !request.applies_to(ecu.kind) {
                    continue;
                }
            }

            let addr = ecu.address();
            if addr.is_functional() {
                functional.insert(addr);
            } else {
                parallel.insert(addr);
            }
        }

        debug!(
            parallel = parallel.len(),
            sequential = functional.len(),
            "Computed address batches"
        );

        let mut batches = Vec::with_capacity(functional.len() + 1);
        batches.push(parallel.into_iter().collect());
        batches.extend(functional.into_iter().map(|addr| vec![addr]));
        batches
    }

    /// Every address any request may be sent to
    pub fn all_known_addresses(&self) -> IndexSet<EcuAddress> {
        self.address_batches(None).into_iter().flatten().collect()
    }

    /// Kind of the first database ECU at this address, in model order
    ///
    /// Returns `None` for addresses not in the firmware database; extra ECUs
    /// are not consulted.
    pub fn ecu_kind_for(&self, addr: u32, sub_addr: Option<u8>) -> Option<EcuKind> {
        let wanted = EcuAddress::new(addr, sub_addr);
        self.fw_versions
            .values()
            .flat_map(|ecus| ecus.keys())
            .find(|ecu| ecu.address() == wanted)
            .map(|ecu| ecu.kind)
    }

    /// Kind of the ECU a query to `addr` reaches
    ///
    /// Like [`ecu_kind_for`](Self::ecu_kind_for) but falls back to the
    /// extra ECUs, so data collection responses keep their configured kind.
    pub fn queried_kind_for(&self, addr: EcuAddress) -> Option<EcuKind> {
        self.ecus()
            .find(|ecu| ecu.address() == addr)
            .map(|ecu| ecu.kind)
    }

    /// Whether `model` requires an ECU of `kind` to be present
    pub fn is_essential(&self, kind: EcuKind, model: &str) -> bool {
        !self
            .non_essential_ecus
            .get(&kind)
            .is_some_and(|models| models.contains(model))
    }

    /// Whether an address is only known from the data collection ECUs
    pub fn is_extra_ecu(&self, addr: EcuAddress) -> bool {
        self.ecu_kind_for(addr.addr, addr.sub_addr).is_none()
            && self.extra_ecus.iter().any(|ecu| ecu.address() == addr)
    }

    /// Database ECUs model by model, then the extra ECUs
    fn ecus(&self) -> impl Iterator<Item = &EcuType> {
        self.fw_versions
            .values()
            .flat_map(|ecus| ecus.keys())
            .chain(self.extra_ecus.iter())
    }
}

/// Append a `bus + 4` copy of every auxiliary template after the originals
fn expand_auxiliary(requests: Vec<Request>) -> Vec<Request> {
    let duplicates: Vec<Request> = requests
        .iter()
        .filter(|r| r.auxiliary)
        .map(Request::to_auxiliary)
        .collect();

    let mut expanded = requests;
    expanded.extend(duplicates);
    expanded
}
