// Copyright 2025 - Borealis Labs <contact@borealisvpn.net>
// SPDX-License-Identifier: GPL-3.0-only

use borealis_vpn_api_client::{Device, Region, User};
use borealis_vpn_store::session::DeviceRecord;

/// The session aggregate. Owned and mutated exclusively by the controller
/// task; a token without a device record (or the reverse) must never be
/// observable outside a single operation.
#[derive(Default)]
pub(crate) struct Session {
    pub(crate) token: Option<String>,
    pub(crate) user: Option<User>,
    pub(crate) current_device: Option<DeviceRecord>,
    pub(crate) available_servers: Option<Vec<Region>>,
}

impl Session {
    pub(crate) fn clear_credentials(&mut self) {
        self.token = None;
        self.current_device = None;
    }

    pub(crate) fn region_code_for_city(&self, city: &str) -> Option<String> {
        self.available_servers
            .as_ref()?
            .iter()
            .find(|region| {
                region
                    .cities
                    .iter()
                    .any(|candidate| candidate.name.eq_ignore_ascii_case(city))
            })
            .map(|region| region.code.to_lowercase())
    }
}

/// Emitted once per failed account poll. Multicast to every subscriber;
/// the usual reaction is to force a re-authentication flow.
#[derive(Debug, Clone)]
pub struct HeartbeatFailed {
    pub message: String,
}

pub(crate) fn device_record_from(device: &Device) -> DeviceRecord {
    DeviceRecord {
        id: device.id.clone(),
        name: device.name.clone(),
        pubkey: device.pubkey.clone(),
        created_at: device.created_at,
    }
}

#[cfg(test)]
mod tests {
    use borealis_vpn_api_client::City;

    use super::*;

    fn session_with_servers() -> Session {
        Session {
            available_servers: Some(vec![
                Region {
                    name: "Germany".to_string(),
                    code: "DE".to_string(),
                    cities: vec![City {
                        name: "Frankfurt".to_string(),
                        code: "fra".to_string(),
                        latitude: 50.11,
                        longitude: 8.68,
                        public_key: "a2V5LWZyYQ==".to_string(),
                    }],
                },
                Region {
                    name: "United States".to_string(),
                    code: "US".to_string(),
                    cities: vec![City {
                        name: "Chicago".to_string(),
                        code: "ord".to_string(),
                        latitude: 41.88,
                        longitude: -87.63,
                        public_key: "a2V5LW9yZA==".to_string(),
                    }],
                },
            ]),
            ..Default::default()
        }
    }

    #[test]
    fn region_code_lookup_is_case_normalized() {
        let session = session_with_servers();
        assert_eq!(session.region_code_for_city("Chicago"), Some("us".to_string()));
        assert_eq!(session.region_code_for_city("chicago"), Some("us".to_string()));
        assert_eq!(session.region_code_for_city("Frankfurt"), Some("de".to_string()));
    }

    #[test]
    fn region_code_lookup_misses() {
        let session = session_with_servers();
        assert_eq!(session.region_code_for_city("Atlantis"), None);
        assert_eq!(Session::default().region_code_for_city("Chicago"), None);
    }
}
