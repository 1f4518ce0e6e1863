//! Resource families.
//!
//! Each family (servers, volumes, networks, ...) is a small `Copy` handle
//! borrowed from a [`Client`]. Its methods pick a row from
//! [`crate::operations`] and build a [`Request`]; nothing is sent until the
//! request goes through [`Client::execute`] or the handle's `send`.
//!
//! Methods that take a `params` map forward it as query string (lists,
//! metrics) or JSON body (create, update, most actions) according to the
//! operation's policy. Path identifiers are passed as `&str` so numeric ids
//! and names (zones, RRSets) share one signature.

use crate::client::Client;
use crate::error::Result;
use crate::operations;
use crate::request::{Params, Request};
use crate::response::Response;
use crate::transport::Transport;

macro_rules! resource_family {
    (@params) => { Params::new() };
    (@params $params:ident) => { $params };
    (
        $(#[$doc:meta])*
        $name:ident => $accessor:ident {
            $(
                $(#[$method_doc:meta])*
                fn $method:ident($($arg:ident),*) $(with $params:ident)? => $op:ident;
            )*
        }
    ) => {
        $(#[$doc])*
        pub struct $name<'a, T: Transport> {
            client: &'a Client<T>,
        }

        impl<T: Transport> Clone for $name<'_, T> {
            fn clone(&self) -> Self {
                *self
            }
        }

        impl<T: Transport> Copy for $name<'_, T> {}

        impl<T: Transport> std::fmt::Debug for $name<'_, T> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(stringify!($name))
            }
        }

        impl<T: Transport> Client<T> {
            pub fn $accessor(&self) -> $name<'_, T> {
                $name { client: self }
            }
        }

        impl<'a, T: Transport> $name<'a, T> {
            /// Dispatch a request through the client's transport.
            pub fn send(&self, request: &Request) -> Result<Response> {
                self.client.execute(request)
            }

            $(
                $(#[$method_doc])*
                pub fn $method(&self, $($arg: &str,)* $($params: Params)?) -> Result<Request> {
                    operations::$op.build(&[$($arg),*], resource_family!(@params $($params)?))
                }
            )*
        }
    };
}

resource_family! {
    /// Actions across all resources.
    Actions => actions {
        fn list() with params => LIST_ACTIONS;
        fn get(id) => GET_ACTION;
    }
}

resource_family! {
    /// TLS certificates.
    Certificates => certificates {
        fn list() with params => LIST_CERTIFICATES;
        fn create() with params => CREATE_CERTIFICATE;
        fn get(id) => GET_CERTIFICATE;
        fn update(id) with params => UPDATE_CERTIFICATE;
        fn delete(id) => DELETE_CERTIFICATE;
        fn list_actions(id) with params => LIST_CERTIFICATE_ACTIONS;
        fn get_action(id, action_id) => GET_CERTIFICATE_ACTION;
        /// Retry issuance of a managed certificate.
        fn retry(id) => RETRY_CERTIFICATE;
    }
}

resource_family! {
    Datacenters => datacenters {
        fn list() with params => LIST_DATACENTERS;
        fn get(id) => GET_DATACENTER;
    }
}

resource_family! {
    Firewalls => firewalls {
        fn list() with params => LIST_FIREWALLS;
        fn create() with params => CREATE_FIREWALL;
        fn get(id) => GET_FIREWALL;
        fn update(id) with params => UPDATE_FIREWALL;
        fn delete(id) => DELETE_FIREWALL;
        fn list_actions(id) with params => LIST_FIREWALL_ACTIONS;
        fn get_action(id, action_id) => GET_FIREWALL_ACTION;
        fn apply_to_resources(id) with params => APPLY_FIREWALL_TO_RESOURCES;
        fn remove_from_resources(id) with params => REMOVE_FIREWALL_FROM_RESOURCES;
        /// Replace the full rule set.
        fn set_rules(id) with params => SET_FIREWALL_RULES;
    }
}

resource_family! {
    FloatingIps => floating_ips {
        fn list() with params => LIST_FLOATING_IPS;
        fn create() with params => CREATE_FLOATING_IP;
        fn get(id) => GET_FLOATING_IP;
        fn update(id) with params => UPDATE_FLOATING_IP;
        fn delete(id) => DELETE_FLOATING_IP;
        fn list_actions(id) with params => LIST_FLOATING_IP_ACTIONS;
        fn get_action(id, action_id) => GET_FLOATING_IP_ACTION;
        fn assign(id) with params => ASSIGN_FLOATING_IP;
        fn unassign(id) => UNASSIGN_FLOATING_IP;
        fn change_dns_ptr(id) with params => CHANGE_FLOATING_IP_DNS_PTR;
        fn change_protection(id) with params => CHANGE_FLOATING_IP_PROTECTION;
    }
}

resource_family! {
    Images => images {
        fn list() with params => LIST_IMAGES;
        fn get(id) => GET_IMAGE;
        fn update(id) with params => UPDATE_IMAGE;
        fn delete(id) => DELETE_IMAGE;
        fn list_actions(id) with params => LIST_IMAGE_ACTIONS;
        fn get_action(id, action_id) => GET_IMAGE_ACTION;
        fn change_protection(id) with params => CHANGE_IMAGE_PROTECTION;
    }
}

resource_family! {
    Isos => isos {
        fn list() with params => LIST_ISOS;
        fn get(id) => GET_ISO;
    }
}

resource_family! {
    LoadBalancers => load_balancers {
        fn list() with params => LIST_LOAD_BALANCERS;
        fn create() with params => CREATE_LOAD_BALANCER;
        fn get(id) => GET_LOAD_BALANCER;
        fn update(id) with params => UPDATE_LOAD_BALANCER;
        fn delete(id) => DELETE_LOAD_BALANCER;
        /// Metrics for a time range; `type`, `start` and `end` go in `params`.
        fn metrics(id) with params => GET_LOAD_BALANCER_METRICS;
        fn list_actions(id) with params => LIST_LOAD_BALANCER_ACTIONS;
        fn get_action(id, action_id) => GET_LOAD_BALANCER_ACTION;
        fn add_service(id) with params => ADD_LOAD_BALANCER_SERVICE;
        fn update_service(id) with params => UPDATE_LOAD_BALANCER_SERVICE;
        fn delete_service(id) with params => DELETE_LOAD_BALANCER_SERVICE;
        fn add_target(id) with params => ADD_LOAD_BALANCER_TARGET;
        fn remove_target(id) with params => REMOVE_LOAD_BALANCER_TARGET;
        fn attach_to_network(id) with params => ATTACH_LOAD_BALANCER_TO_NETWORK;
        fn detach_from_network(id) with params => DETACH_LOAD_BALANCER_FROM_NETWORK;
        fn change_algorithm(id) with params => CHANGE_LOAD_BALANCER_ALGORITHM;
        fn change_type(id) with params => CHANGE_LOAD_BALANCER_TYPE;
        fn change_dns_ptr(id) with params => CHANGE_LOAD_BALANCER_DNS_PTR;
        fn change_protection(id) with params => CHANGE_LOAD_BALANCER_PROTECTION;
        fn enable_public_interface(id) => ENABLE_LOAD_BALANCER_PUBLIC_INTERFACE;
        fn disable_public_interface(id) => DISABLE_LOAD_BALANCER_PUBLIC_INTERFACE;
    }
}

resource_family! {
    LoadBalancerTypes => load_balancer_types {
        fn list() with params => LIST_LOAD_BALANCER_TYPES;
        fn get(id) => GET_LOAD_BALANCER_TYPE;
    }
}

resource_family! {
    Locations => locations {
        fn list() with params => LIST_LOCATIONS;
        fn get(id) => GET_LOCATION;
    }
}

resource_family! {
    /// Private networks, their subnets and routes.
    Networks => networks {
        fn list() with params => LIST_NETWORKS;
        fn create() with params => CREATE_NETWORK;
        fn get(id) => GET_NETWORK;
        fn update(id) with params => UPDATE_NETWORK;
        fn delete(id) => DELETE_NETWORK;
        fn list_actions(id) with params => LIST_NETWORK_ACTIONS;
        fn get_action(id, action_id) => GET_NETWORK_ACTION;
        fn add_route(id) with params => ADD_NETWORK_ROUTE;
        fn delete_route(id) with params => DELETE_NETWORK_ROUTE;
        fn add_subnet(id) with params => ADD_NETWORK_SUBNET;
        fn delete_subnet(id) with params => DELETE_NETWORK_SUBNET;
        fn change_ip_range(id) with params => CHANGE_NETWORK_IP_RANGE;
        fn change_protection(id) with params => CHANGE_NETWORK_PROTECTION;
    }
}

resource_family! {
    PlacementGroups => placement_groups {
        fn list() with params => LIST_PLACEMENT_GROUPS;
        fn create() with params => CREATE_PLACEMENT_GROUP;
        fn get(id) => GET_PLACEMENT_GROUP;
        fn update(id) with params => UPDATE_PLACEMENT_GROUP;
        fn delete(id) => DELETE_PLACEMENT_GROUP;
    }
}

resource_family! {
    Pricing => pricing {
        fn get() => GET_PRICING;
    }
}

resource_family! {
    PrimaryIps => primary_ips {
        fn list() with params => LIST_PRIMARY_IPS;
        fn create() with params => CREATE_PRIMARY_IP;
        fn get(id) => GET_PRIMARY_IP;
        fn update(id) with params => UPDATE_PRIMARY_IP;
        fn delete(id) => DELETE_PRIMARY_IP;
        fn list_actions(id) with params => LIST_PRIMARY_IP_ACTIONS;
        fn get_action(id, action_id) => GET_PRIMARY_IP_ACTION;
        fn assign(id) with params => ASSIGN_PRIMARY_IP;
        fn unassign(id) => UNASSIGN_PRIMARY_IP;
        fn change_dns_ptr(id) with params => CHANGE_PRIMARY_IP_DNS_PTR;
        fn change_protection(id) with params => CHANGE_PRIMARY_IP_PROTECTION;
    }
}

resource_family! {
    ServerTypes => server_types {
        fn list() with params => LIST_SERVER_TYPES;
        fn get(id) => GET_SERVER_TYPE;
    }
}

resource_family! {
    /// Servers and their power, rescue, backup, network and ISO actions.
    Servers => servers {
        fn list() with params => LIST_SERVERS;
        fn create() with params => CREATE_SERVER;
        fn get(id) => GET_SERVER;
        fn update(id) with params => UPDATE_SERVER;
        fn delete(id) => DELETE_SERVER;
        /// Metrics for a time range; `type`, `start` and `end` go in `params`.
        fn metrics(id) with params => GET_SERVER_METRICS;
        fn list_actions(id) with params => LIST_SERVER_ACTIONS;
        fn get_action(id, action_id) => GET_SERVER_ACTION;
        fn power_on(id) => POWER_ON_SERVER;
        fn power_off(id) => POWER_OFF_SERVER;
        fn reboot(id) => REBOOT_SERVER;
        fn reset(id) => RESET_SERVER;
        /// ACPI shutdown; the guest decides whether to honour it.
        fn shutdown(id) => SHUTDOWN_SERVER;
        fn reset_password(id) => RESET_SERVER_PASSWORD;
        fn rebuild(id) with params => REBUILD_SERVER;
        fn change_type(id) with params => CHANGE_SERVER_TYPE;
        fn enable_rescue(id) with params => ENABLE_SERVER_RESCUE;
        fn disable_rescue(id) => DISABLE_SERVER_RESCUE;
        fn create_image(id) with params => CREATE_SERVER_IMAGE;
        fn enable_backup(id) => ENABLE_SERVER_BACKUP;
        fn disable_backup(id) => DISABLE_SERVER_BACKUP;
        fn attach_iso(id) with params => ATTACH_SERVER_ISO;
        fn detach_iso(id) => DETACH_SERVER_ISO;
        fn change_dns_ptr(id) with params => CHANGE_SERVER_DNS_PTR;
        fn change_protection(id) with params => CHANGE_SERVER_PROTECTION;
        fn request_console(id) => REQUEST_SERVER_CONSOLE;
        fn attach_to_network(id) with params => ATTACH_SERVER_TO_NETWORK;
        fn detach_from_network(id) with params => DETACH_SERVER_FROM_NETWORK;
        fn change_alias_ips(id) with params => CHANGE_SERVER_ALIAS_IPS;
        fn add_to_placement_group(id) with params => ADD_SERVER_TO_PLACEMENT_GROUP;
        fn remove_from_placement_group(id) => REMOVE_SERVER_FROM_PLACEMENT_GROUP;
    }
}

resource_family! {
    SshKeys => ssh_keys {
        fn list() with params => LIST_SSH_KEYS;
        fn create() with params => CREATE_SSH_KEY;
        fn get(id) => GET_SSH_KEY;
        fn update(id) with params => UPDATE_SSH_KEY;
        fn delete(id) => DELETE_SSH_KEY;
    }
}

resource_family! {
    /// Block storage volumes.
    Volumes => volumes {
        fn list() with params => LIST_VOLUMES;
        fn create() with params => CREATE_VOLUME;
        fn get(id) => GET_VOLUME;
        fn update(id) with params => UPDATE_VOLUME;
        fn delete(id) => DELETE_VOLUME;
        fn list_actions(id) with params => LIST_VOLUME_ACTIONS;
        fn get_action(id, action_id) => GET_VOLUME_ACTION;
        fn attach(id) with params => ATTACH_VOLUME;
        fn detach(id) => DETACH_VOLUME;
        /// Grow a volume; volumes cannot shrink.
        fn resize(id) with params => RESIZE_VOLUME;
        fn change_protection(id) with params => CHANGE_VOLUME_PROTECTION;
    }
}

resource_family! {
    /// DNS zones. Zones are addressed by id or by name.
    Zones => zones {
        fn list() with params => LIST_ZONES;
        fn create() with params => CREATE_ZONE;
        fn get(id_or_name) => GET_ZONE;
        fn update(id_or_name) with params => UPDATE_ZONE;
        fn delete(id_or_name) => DELETE_ZONE;
        fn export_zonefile(id_or_name) => EXPORT_ZONEFILE;
        fn list_actions(id_or_name) with params => LIST_ZONE_ACTIONS;
        fn get_action(id_or_name, action_id) => GET_ZONE_ACTION;
        fn import_zonefile(id_or_name) with params => IMPORT_ZONEFILE;
        fn change_primary_nameservers(id_or_name) with params => CHANGE_ZONE_PRIMARY_NAMESERVERS;
        fn change_protection(id_or_name) with params => CHANGE_ZONE_PROTECTION;
        fn change_ttl(id_or_name) with params => CHANGE_ZONE_TTL;
    }
}

resource_family! {
    /// Record sets inside a DNS zone, addressed by zone, name and type.
    Rrsets => rrsets {
        fn list(zone) with params => LIST_RRSETS;
        fn create(zone) with params => CREATE_RRSET;
        fn get(zone, name, rr_type) => GET_RRSET;
        fn update(zone, name, rr_type) with params => UPDATE_RRSET;
        fn delete(zone, name, rr_type) => DELETE_RRSET;
        fn set_records(zone, name, rr_type) with params => SET_RRSET_RECORDS;
        fn add_records(zone, name, rr_type) with params => ADD_RRSET_RECORDS;
        fn remove_records(zone, name, rr_type) with params => REMOVE_RRSET_RECORDS;
        fn change_ttl(zone, name, rr_type) with params => CHANGE_RRSET_TTL;
        fn change_protection(zone, name, rr_type) with params => CHANGE_RRSET_PROTECTION;
    }
}
