//! Table of API operations.
//!
//! Every endpoint is a row: identifier, HTTP method, URI template and payload
//! policy. [`Operation::build`] is the single builder that turns a row, its
//! path parameters and a parameter map into a [`Request`]. Templates are
//! relative to the API base URL (which carries the `/v1` prefix) and name
//! their placeholders in braces: `/servers/{id}/actions/poweron`.

use crate::error::{Error, Result};
use crate::http::HttpMethod;
use crate::request::{Params, Payload, PayloadPolicy, Request};

/// One API endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    pub id: &'static str,
    pub method: HttpMethod,
    pub template: &'static str,
    pub policy: PayloadPolicy,
}

impl Operation {
    /// Number of `{...}` placeholders in the template.
    pub fn path_param_count(&self) -> usize {
        self.template.matches('{').count()
    }

    /// Substitute `path_params` into the template, in order, and attach
    /// `params` according to the payload policy.
    ///
    /// Each path parameter must be non-empty, must not be `.` or `..` and
    /// must not contain `/`, `?`, `#`, `%` or whitespace; the count must match
    /// the template. Accepted values are substituted verbatim.
    pub fn build(&self, path_params: &[&str], params: Params) -> Result<Request> {
        let expected = self.path_param_count();
        if path_params.len() != expected {
            return Err(self.invalid(format!(
                "expected {expected} path parameter(s), got {}",
                path_params.len()
            )));
        }

        let mut uri = String::with_capacity(self.template.len() + 16);
        let mut rest = self.template;
        for value in path_params {
            let (Some(open), Some(close)) = (rest.find('{'), rest.find('}')) else {
                break;
            };
            let name = &rest[open + 1..close];
            self.check_segment(name, value)?;
            uri.push_str(&rest[..open]);
            uri.push_str(value);
            rest = &rest[close + 1..];
        }
        uri.push_str(rest);

        Ok(Request::new(self.id, self.method, uri, Payload::new(self.policy, params)))
    }

    fn check_segment(&self, name: &str, value: &str) -> Result<()> {
        if value.is_empty() {
            return Err(self.invalid(format!("`{name}` must not be empty")));
        }
        if value == "." || value == ".." {
            return Err(self.invalid(format!("`{name}` must not be a dot segment: {value:?}")));
        }
        if value
            .chars()
            .any(|c| matches!(c, '/' | '?' | '#' | '%') || c.is_whitespace())
        {
            return Err(self.invalid(format!("`{name}` is not a single path segment: {value:?}")));
        }
        Ok(())
    }

    fn invalid(&self, reason: String) -> Error {
        Error::InvalidPathParameter {
            operation: self.id,
            reason,
        }
    }
}

/// Look an operation up by identifier.
pub fn find(id: &str) -> Option<&'static Operation> {
    ALL.iter().find(|op| op.id == id)
}

macro_rules! operations {
    ($( $id:ident => $name:ident: $method:ident $template:literal, $policy:ident; )*) => {
        $(
            pub const $name: Operation = Operation {
                id: stringify!($id),
                method: HttpMethod::$method,
                template: $template,
                policy: PayloadPolicy::$policy,
            };
        )*

        /// Every operation, in table order.
        pub const ALL: &[Operation] = &[$($name),*];
    };
}

operations! {
    // actions
    list_actions => LIST_ACTIONS: Get "/actions", Query;
    get_action => GET_ACTION: Get "/actions/{id}", None;

    // certificates
    list_certificates => LIST_CERTIFICATES: Get "/certificates", Query;
    create_certificate => CREATE_CERTIFICATE: Post "/certificates", Body;
    get_certificate => GET_CERTIFICATE: Get "/certificates/{id}", None;
    update_certificate => UPDATE_CERTIFICATE: Put "/certificates/{id}", Body;
    delete_certificate => DELETE_CERTIFICATE: Delete "/certificates/{id}", None;
    list_certificate_actions => LIST_CERTIFICATE_ACTIONS: Get "/certificates/{id}/actions", Query;
    get_certificate_action => GET_CERTIFICATE_ACTION: Get "/certificates/{id}/actions/{action_id}", None;
    retry_certificate => RETRY_CERTIFICATE: Post "/certificates/{id}/actions/retry", None;

    // datacenters
    list_datacenters => LIST_DATACENTERS: Get "/datacenters", Query;
    get_datacenter => GET_DATACENTER: Get "/datacenters/{id}", None;

    // firewalls
    list_firewalls => LIST_FIREWALLS: Get "/firewalls", Query;
    create_firewall => CREATE_FIREWALL: Post "/firewalls", Body;
    get_firewall => GET_FIREWALL: Get "/firewalls/{id}", None;
    update_firewall => UPDATE_FIREWALL: Put "/firewalls/{id}", Body;
    delete_firewall => DELETE_FIREWALL: Delete "/firewalls/{id}", None;
    list_firewall_actions => LIST_FIREWALL_ACTIONS: Get "/firewalls/{id}/actions", Query;
    get_firewall_action => GET_FIREWALL_ACTION: Get "/firewalls/{id}/actions/{action_id}", None;
    apply_firewall_to_resources => APPLY_FIREWALL_TO_RESOURCES: Post "/firewalls/{id}/actions/apply_to_resources", Body;
    remove_firewall_from_resources => REMOVE_FIREWALL_FROM_RESOURCES: Post "/firewalls/{id}/actions/remove_from_resources", Body;
    set_firewall_rules => SET_FIREWALL_RULES: Post "/firewalls/{id}/actions/set_rules", Body;

    // floating IPs
    list_floating_ips => LIST_FLOATING_IPS: Get "/floating_ips", Query;
    create_floating_ip => CREATE_FLOATING_IP: Post "/floating_ips", Body;
    get_floating_ip => GET_FLOATING_IP: Get "/floating_ips/{id}", None;
    update_floating_ip => UPDATE_FLOATING_IP: Put "/floating_ips/{id}", Body;
    delete_floating_ip => DELETE_FLOATING_IP: Delete "/floating_ips/{id}", None;
    list_floating_ip_actions => LIST_FLOATING_IP_ACTIONS: Get "/floating_ips/{id}/actions", Query;
    get_floating_ip_action => GET_FLOATING_IP_ACTION: Get "/floating_ips/{id}/actions/{action_id}", None;
    assign_floating_ip => ASSIGN_FLOATING_IP: Post "/floating_ips/{id}/actions/assign", Body;
    unassign_floating_ip => UNASSIGN_FLOATING_IP: Post "/floating_ips/{id}/actions/unassign", None;
    change_floating_ip_dns_ptr => CHANGE_FLOATING_IP_DNS_PTR: Post "/floating_ips/{id}/actions/change_dns_ptr", Body;
    change_floating_ip_protection => CHANGE_FLOATING_IP_PROTECTION: Post "/floating_ips/{id}/actions/change_protection", Body;

    // images
    list_images => LIST_IMAGES: Get "/images", Query;
    get_image => GET_IMAGE: Get "/images/{id}", None;
    update_image => UPDATE_IMAGE: Put "/images/{id}", Body;
    delete_image => DELETE_IMAGE: Delete "/images/{id}", None;
    list_image_actions => LIST_IMAGE_ACTIONS: Get "/images/{id}/actions", Query;
    get_image_action => GET_IMAGE_ACTION: Get "/images/{id}/actions/{action_id}", None;
    change_image_protection => CHANGE_IMAGE_PROTECTION: Post "/images/{id}/actions/change_protection", Body;

    // ISOs
    list_isos => LIST_ISOS: Get "/isos", Query;
    get_iso => GET_ISO: Get "/isos/{id}", None;

    // load balancers
    list_load_balancers => LIST_LOAD_BALANCERS: Get "/load_balancers", Query;
    create_load_balancer => CREATE_LOAD_BALANCER: Post "/load_balancers", Body;
    get_load_balancer => GET_LOAD_BALANCER: Get "/load_balancers/{id}", None;
    update_load_balancer => UPDATE_LOAD_BALANCER: Put "/load_balancers/{id}", Body;
    delete_load_balancer => DELETE_LOAD_BALANCER: Delete "/load_balancers/{id}", None;
    get_load_balancer_metrics => GET_LOAD_BALANCER_METRICS: Get "/load_balancers/{id}/metrics", Query;
    list_load_balancer_actions => LIST_LOAD_BALANCER_ACTIONS: Get "/load_balancers/{id}/actions", Query;
    get_load_balancer_action => GET_LOAD_BALANCER_ACTION: Get "/load_balancers/{id}/actions/{action_id}", None;
    add_load_balancer_service => ADD_LOAD_BALANCER_SERVICE: Post "/load_balancers/{id}/actions/add_service", Body;
    update_load_balancer_service => UPDATE_LOAD_BALANCER_SERVICE: Post "/load_balancers/{id}/actions/update_service", Body;
    delete_load_balancer_service => DELETE_LOAD_BALANCER_SERVICE: Post "/load_balancers/{id}/actions/delete_service", Body;
    add_load_balancer_target => ADD_LOAD_BALANCER_TARGET: Post "/load_balancers/{id}/actions/add_target", Body;
    remove_load_balancer_target => REMOVE_LOAD_BALANCER_TARGET: Post "/load_balancers/{id}/actions/remove_target", Body;
    attach_load_balancer_to_network => ATTACH_LOAD_BALANCER_TO_NETWORK: Post "/load_balancers/{id}/actions/attach_to_network", Body;
    detach_load_balancer_from_network => DETACH_LOAD_BALANCER_FROM_NETWORK: Post "/load_balancers/{id}/actions/detach_from_network", Body;
    change_load_balancer_algorithm => CHANGE_LOAD_BALANCER_ALGORITHM: Post "/load_balancers/{id}/actions/change_algorithm", Body;
    change_load_balancer_type => CHANGE_LOAD_BALANCER_TYPE: Post "/load_balancers/{id}/actions/change_type", Body;
    change_load_balancer_dns_ptr => CHANGE_LOAD_BALANCER_DNS_PTR: Post "/load_balancers/{id}/actions/change_dns_ptr", Body;
    change_load_balancer_protection => CHANGE_LOAD_BALANCER_PROTECTION: Post "/load_balancers/{id}/actions/change_protection", Body;
    enable_load_balancer_public_interface => ENABLE_LOAD_BALANCER_PUBLIC_INTERFACE: Post "/load_balancers/{id}/actions/enable_public_interface", None;
    disable_load_balancer_public_interface => DISABLE_LOAD_BALANCER_PUBLIC_INTERFACE: Post "/load_balancers/{id}/actions/disable_public_interface", None;

    // load balancer types
    list_load_balancer_types => LIST_LOAD_BALANCER_TYPES: Get "/load_balancer_types", Query;
    get_load_balancer_type => GET_LOAD_BALANCER_TYPE: Get "/load_balancer_types/{id}", None;

    // locations
    list_locations => LIST_LOCATIONS: Get "/locations", Query;
    get_location => GET_LOCATION: Get "/locations/{id}", None;

    // networks
    list_networks => LIST_NETWORKS: Get "/networks", Query;
    create_network => CREATE_NETWORK: Post "/networks", Body;
    get_network => GET_NETWORK: Get "/networks/{id}", None;
    update_network => UPDATE_NETWORK: Put "/networks/{id}", Body;
    delete_network => DELETE_NETWORK: Delete "/networks/{id}", None;
    list_network_actions => LIST_NETWORK_ACTIONS: Get "/networks/{id}/actions", Query;
    get_network_action => GET_NETWORK_ACTION: Get "/networks/{id}/actions/{action_id}", None;
    add_network_route => ADD_NETWORK_ROUTE: Post "/networks/{id}/actions/add_route", Body;
    delete_network_route => DELETE_NETWORK_ROUTE: Post "/networks/{id}/actions/delete_route", Body;
    add_network_subnet => ADD_NETWORK_SUBNET: Post "/networks/{id}/actions/add_subnet", Body;
    delete_network_subnet => DELETE_NETWORK_SUBNET: Post "/networks/{id}/actions/delete_subnet", Body;
    change_network_ip_range => CHANGE_NETWORK_IP_RANGE: Post "/networks/{id}/actions/change_ip_range", Body;
    change_network_protection => CHANGE_NETWORK_PROTECTION: Post "/networks/{id}/actions/change_protection", Body;

    // placement groups
    list_placement_groups => LIST_PLACEMENT_GROUPS: Get "/placement_groups", Query;
    create_placement_group => CREATE_PLACEMENT_GROUP: Post "/placement_groups", Body;
    get_placement_group => GET_PLACEMENT_GROUP: Get "/placement_groups/{id}", None;
    update_placement_group => UPDATE_PLACEMENT_GROUP: Put "/placement_groups/{id}", Body;
    delete_placement_group => DELETE_PLACEMENT_GROUP: Delete "/placement_groups/{id}", None;

    // pricing
    get_pricing => GET_PRICING: Get "/pricing", None;

    // primary IPs
    list_primary_ips => LIST_PRIMARY_IPS: Get "/primary_ips", Query;
    create_primary_ip => CREATE_PRIMARY_IP: Post "/primary_ips", Body;
    get_primary_ip => GET_PRIMARY_IP: Get "/primary_ips/{id}", None;
    update_primary_ip => UPDATE_PRIMARY_IP: Put "/primary_ips/{id}", Body;
    delete_primary_ip => DELETE_PRIMARY_IP: Delete "/primary_ips/{id}", None;
    list_primary_ip_actions => LIST_PRIMARY_IP_ACTIONS: Get "/primary_ips/{id}/actions", Query;
    get_primary_ip_action => GET_PRIMARY_IP_ACTION: Get "/primary_ips/{id}/actions/{action_id}", None;
    assign_primary_ip => ASSIGN_PRIMARY_IP: Post "/primary_ips/{id}/actions/assign", Body;
    unassign_primary_ip => UNASSIGN_PRIMARY_IP: Post "/primary_ips/{id}/actions/unassign", None;
    change_primary_ip_dns_ptr => CHANGE_PRIMARY_IP_DNS_PTR: Post "/primary_ips/{id}/actions/change_dns_ptr", Body;
    change_primary_ip_protection => CHANGE_PRIMARY_IP_PROTECTION: Post "/primary_ips/{id}/actions/change_protection", Body;

    // server types
    list_server_types => LIST_SERVER_TYPES: Get "/server_types", Query;
    get_server_type => GET_SERVER_TYPE: Get "/server_types/{id}", None;

    // servers
    list_servers => LIST_SERVERS: Get "/servers", Query;
    create_server => CREATE_SERVER: Post "/servers", Body;
    get_server => GET_SERVER: Get "/servers/{id}", None;
    update_server => UPDATE_SERVER: Put "/servers/{id}", Body;
    delete_server => DELETE_SERVER: Delete "/servers/{id}", None;
    get_server_metrics => GET_SERVER_METRICS: Get "/servers/{id}/metrics", Query;
    list_server_actions => LIST_SERVER_ACTIONS: Get "/servers/{id}/actions", Query;
    get_server_action => GET_SERVER_ACTION: Get "/servers/{id}/actions/{action_id}", None;
    power_on_server => POWER_ON_SERVER: Post "/servers/{id}/actions/poweron", None;
    power_off_server => POWER_OFF_SERVER: Post "/servers/{id}/actions/poweroff", None;
    reboot_server => REBOOT_SERVER: Post "/servers/{id}/actions/reboot", None;
    reset_server => RESET_SERVER: Post "/servers/{id}/actions/reset", None;
    shutdown_server => SHUTDOWN_SERVER: Post "/servers/{id}/actions/shutdown", None;
    reset_server_password => RESET_SERVER_PASSWORD: Post "/servers/{id}/actions/reset_password", None;
    rebuild_server => REBUILD_SERVER: Post "/servers/{id}/actions/rebuild", Body;
    change_server_type => CHANGE_SERVER_TYPE: Post "/servers/{id}/actions/change_type", Body;
    enable_server_rescue => ENABLE_SERVER_RESCUE: Post "/servers/{id}/actions/enable_rescue", Body;
    disable_server_rescue => DISABLE_SERVER_RESCUE: Post "/servers/{id}/actions/disable_rescue", None;
    create_server_image => CREATE_SERVER_IMAGE: Post "/servers/{id}/actions/create_image", Body;
    enable_server_backup => ENABLE_SERVER_BACKUP: Post "/servers/{id}/actions/enable_backup", None;
    disable_server_backup => DISABLE_SERVER_BACKUP: Post "/servers/{id}/actions/disable_backup", None;
    attach_server_iso => ATTACH_SERVER_ISO: Post "/servers/{id}/actions/attach_iso", Body;
    detach_server_iso => DETACH_SERVER_ISO: Post "/servers/{id}/actions/detach_iso", None;
    change_server_dns_ptr => CHANGE_SERVER_DNS_PTR: Post "/servers/{id}/actions/change_dns_ptr", Body;
    change_server_protection => CHANGE_SERVER_PROTECTION: Post "/servers/{id}/actions/change_protection", Body;
    request_server_console => REQUEST_SERVER_CONSOLE: Post "/servers/{id}/actions/request_console", None;
    attach_server_to_network => ATTACH_SERVER_TO_NETWORK: Post "/servers/{id}/actions/attach_to_network", Body;
    detach_server_from_network => DETACH_SERVER_FROM_NETWORK: Post "/servers/{id}/actions/detach_from_network", Body;
    change_server_alias_ips => CHANGE_SERVER_ALIAS_IPS: Post "/servers/{id}/actions/change_alias_ips", Body;
    add_server_to_placement_group => ADD_SERVER_TO_PLACEMENT_GROUP: Post "/servers/{id}/actions/add_to_placement_group", Body;
    remove_server_from_placement_group => REMOVE_SERVER_FROM_PLACEMENT_GROUP: Post "/servers/{id}/actions/remove_from_placement_group", None;

    // SSH keys
    list_ssh_keys => LIST_SSH_KEYS: Get "/ssh_keys", Query;
    create_ssh_key => CREATE_SSH_KEY: Post "/ssh_keys", Body;
    get_ssh_key => GET_SSH_KEY: Get "/ssh_keys/{id}", None;
    update_ssh_key => UPDATE_SSH_KEY: Put "/ssh_keys/{id}", Body;
    delete_ssh_key => DELETE_SSH_KEY: Delete "/ssh_keys/{id}", None;

    // volumes
    list_volumes => LIST_VOLUMES: Get "/volumes", Query;
    create_volume => CREATE_VOLUME: Post "/volumes", Body;
    get_volume => GET_VOLUME: Get "/volumes/{id}", None;
    update_volume => UPDATE_VOLUME: Put "/volumes/{id}", Body;
    delete_volume => DELETE_VOLUME: Delete "/volumes/{id}", None;
    list_volume_actions => LIST_VOLUME_ACTIONS: Get "/volumes/{id}/actions", Query;
    get_volume_action => GET_VOLUME_ACTION: Get "/volumes/{id}/actions/{action_id}", None;
    attach_volume => ATTACH_VOLUME: Post "/volumes/{id}/actions/attach", Body;
    detach_volume => DETACH_VOLUME: Post "/volumes/{id}/actions/detach", None;
    resize_volume => RESIZE_VOLUME: Post "/volumes/{id}/actions/resize", Body;
    change_volume_protection => CHANGE_VOLUME_PROTECTION: Post "/volumes/{id}/actions/change_protection", Body;

    // DNS zones
    list_zones => LIST_ZONES: Get "/zones", Query;
    create_zone => CREATE_ZONE: Post "/zones", Body;
    get_zone => GET_ZONE: Get "/zones/{id_or_name}", None;
    update_zone => UPDATE_ZONE: Put "/zones/{id_or_name}", Body;
    delete_zone => DELETE_ZONE: Delete "/zones/{id_or_name}", None;
    export_zonefile => EXPORT_ZONEFILE: Get "/zones/{id_or_name}/zonefile", None;
    list_zone_actions => LIST_ZONE_ACTIONS: Get "/zones/{id_or_name}/actions", Query;
    get_zone_action => GET_ZONE_ACTION: Get "/zones/{id_or_name}/actions/{action_id}", None;
    import_zonefile => IMPORT_ZONEFILE: Post "/zones/{id_or_name}/actions/import_zonefile", Body;
    change_zone_primary_nameservers => CHANGE_ZONE_PRIMARY_NAMESERVERS: Post "/zones/{id_or_name}/actions/change_primary_nameservers", Body;
    change_zone_protection => CHANGE_ZONE_PROTECTION: Post "/zones/{id_or_name}/actions/change_protection", Body;
    change_zone_ttl => CHANGE_ZONE_TTL: Post "/zones/{id_or_name}/actions/change_ttl", Body;

    // DNS zone RRSets
    list_rrsets => LIST_RRSETS: Get "/zones/{id_or_name}/rrsets", Query;
    create_rrset => CREATE_RRSET: Post "/zones/{id_or_name}/rrsets", Body;
    get_rrset => GET_RRSET: Get "/zones/{id_or_name}/rrsets/{rr_name}/{rr_type}", None;
    update_rrset => UPDATE_RRSET: Put "/zones/{id_or_name}/rrsets/{rr_name}/{rr_type}", Body;
    delete_rrset => DELETE_RRSET: Delete "/zones/{id_or_name}/rrsets/{rr_name}/{rr_type}", None;
    set_rrset_records => SET_RRSET_RECORDS: Post "/zones/{id_or_name}/rrsets/{rr_name}/{rr_type}/actions/set_records", Body;
    add_rrset_records => ADD_RRSET_RECORDS: Post "/zones/{id_or_name}/rrsets/{rr_name}/{rr_type}/actions/add_records", Body;
    remove_rrset_records => REMOVE_RRSET_RECORDS: Post "/zones/{id_or_name}/rrsets/{rr_name}/{rr_type}/actions/remove_records", Body;
    change_rrset_ttl => CHANGE_RRSET_TTL: Post "/zones/{id_or_name}/rrsets/{rr_name}/{rr_type}/actions/change_ttl", Body;
    change_rrset_protection => CHANGE_RRSET_PROTECTION: Post "/zones/{id_or_name}/rrsets/{rr_name}/{rr_type}/actions/change_protection", Body;
}
