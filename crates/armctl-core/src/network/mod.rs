//! Application gateway editing

pub mod redirect;

pub use redirect::{
    ApplicationGateway, RedirectConfiguration, RedirectType, SubResource,
    add_redirect_configuration, get_redirect_configuration, remove_redirect_configuration,
};
