pub mod github_client;
pub mod maven_central_client;
pub mod osv_client;

pub use github_client::GitHubClient;
pub use maven_central_client::MavenCentralClient;
pub use osv_client::OsvClient;
