mod home;
pub use home::Home;

mod login;
pub use login::Login;

mod workbench;
pub use workbench::Workbench;

mod protocols;
pub use protocols::ProtocolManager;

mod report;
pub use report::Report;
