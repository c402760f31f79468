pub mod discussion;
pub mod issue;
pub mod label;
pub mod project;
pub mod user;
pub mod workspace;

pub use discussion::Discussion;
pub use issue::{Issue, IssueSummary};
pub use label::Label;
pub use project::Project;
pub use user::User;
pub use workspace::{Workspace, WorkspaceMember};
