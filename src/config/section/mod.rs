//! Configuration section definitions.
//!
//! Each module corresponds to a section in `prerender.toml`:
//!
//! | Module    | TOML Section  | Purpose                                   |
//! |-----------|---------------|-------------------------------------------|
//! | `site`    | `[site]`      | Canonical origin, mount node, defaults    |
//! | `build`   | `[build]`     | Bundler output directory                  |
//! | `serve`   | `[serve]`     | Local origin server                       |
//! | `browser` | `[browser]`   | Browser discovery, blocking, timeouts     |
//! | `routes`  | `[[routes]]`  | Route table overrides                     |

mod browser;
mod build;
mod routes;
mod serve;
mod site;

pub use browser::BrowserConfig;
pub use build::BuildSectionConfig;
pub use routes::RouteEntry;
pub use serve::ServeConfig;
pub use site::SiteSectionConfig;
