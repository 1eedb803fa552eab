//! The static catalog of supported log sources.

use serde::Serialize;

/// A log-generating technology the assistant knows how to onboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceDescriptor {
    /// Stable key; also the document file stem
    pub id: &'static str,
    pub display_name: &'static str,
    pub category: &'static str,
    pub vendor: &'static str,
}

/// Every supported source, in display order.
pub const CATALOG: &[SourceDescriptor] = &[
    SourceDescriptor {
        id: "palo_alto",
        display_name: "Palo Alto Firewall",
        category: "Firewall",
        vendor: "Palo Alto Networks",
    },
    SourceDescriptor {
        id: "windows_events",
        display_name: "Windows Events",
        category: "Operating System",
        vendor: "Microsoft",
    },
    SourceDescriptor {
        id: "linux",
        display_name: "Linux (Syslog)",
        category: "Operating System",
        vendor: "Various",
    },
    SourceDescriptor {
        id: "azure_ad",
        display_name: "Azure AD (Microsoft Entra ID)",
        category: "Identity & Access",
        vendor: "Microsoft",
    },
    SourceDescriptor {
        id: "cisco_asa",
        display_name: "Cisco ASA",
        category: "Firewall",
        vendor: "Cisco",
    },
    SourceDescriptor {
        id: "checkpoint",
        display_name: "Check Point Firewall",
        category: "Firewall",
        vendor: "Check Point",
    },
    SourceDescriptor {
        id: "crowdstrike_edr",
        display_name: "CrowdStrike EDR",
        category: "Endpoint Detection & Response",
        vendor: "CrowdStrike",
    },
    SourceDescriptor {
        id: "o365",
        display_name: "Office 365 (Microsoft 365)",
        category: "Cloud Services",
        vendor: "Microsoft",
    },
    SourceDescriptor {
        id: "proofpoint",
        display_name: "Proofpoint",
        category: "Email Security",
        vendor: "Proofpoint",
    },
    SourceDescriptor {
        id: "zscaler_proxy",
        display_name: "Zscaler Proxy",
        category: "Secure Web Gateway",
        vendor: "Zscaler",
    },
];

/// Look up a catalog entry by id.
pub fn find(id: &str) -> Option<&'static SourceDescriptor> {
    CATALOG.iter().find(|s| s.id == id)
}
