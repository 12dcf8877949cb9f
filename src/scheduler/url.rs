//! Endpoint URL derivation from site bindings.
//!
//! Pure functions: a binding either yields a base URL or it doesn't, and a
//! site inventory maps to the set of checkable endpoints.

use crate::platform::{Binding, Site, SiteState};
use crate::store::EndpointId;

/// A checkable endpoint: its identity plus the URL to probe.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    pub id: EndpointId,
    pub url: String,
}

/// Build a base URL from a binding, or `None` when the binding cannot
/// yield one.
///
/// `binding_information` is colon-separated `ip:port:host`; the host
/// component is optional and defaults to `localhost` when blank. The port
/// suffix is omitted for http/80 and https/443.
pub fn base_url(binding: &Binding) -> Option<String> {
    let scheme = binding.protocol.to_ascii_lowercase();
    let parts: Vec<&str> = binding.binding_information.split(':').collect();
    if parts.len() < 2 {
        return None;
    }

    let port = parts[1];
    if port.is_empty() {
        return None;
    }

    let host = match parts.get(2) {
        Some(h) if !h.is_empty() => h,
        _ => "localhost",
    };

    let default_port =
        matches!((scheme.as_str(), port), ("http", "80") | ("https", "443"));
    let port_suffix = if default_port {
        String::new()
    } else {
        format!(":{}", port)
    };

    Some(format!("{}://{}{}/", scheme, host, port_suffix))
}

/// Base URL a site is reachable at, from its first HTTP binding that
/// parses into a URL. A site with several HTTP bindings is addressed
/// through one of them only.
pub fn site_base_url(site: &Site) -> Option<String> {
    site.bindings
        .iter()
        .filter(|b| b.protocol.to_ascii_lowercase().starts_with("http"))
        .find_map(base_url)
}

/// Derive the checkable endpoints for a fresh inventory: one root endpoint
/// per started site with a usable HTTP binding, plus one per
/// sub-application. Sites that are not started, or that have no usable
/// HTTP binding, yield nothing.
pub fn derive_endpoints(sites: &[Site]) -> Vec<Endpoint> {
    let mut endpoints = Vec::new();

    for site in sites {
        if site.state != SiteState::Started {
            continue;
        }

        let Some(base) = site_base_url(site) else {
            continue;
        };

        endpoints.push(Endpoint {
            id: EndpointId::site_root(&site.name),
            url: base.clone(),
        });

        for app in &site.applications {
            endpoints.push(Endpoint {
                id: EndpointId::new(&site.name, &app.path),
                url: application_url(&base, &app.path),
            });
        }
    }

    endpoints
}

/// Join an application path onto a site base URL.
pub fn application_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}
