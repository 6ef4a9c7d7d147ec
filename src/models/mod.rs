pub mod admin;
pub mod argu;
pub mod bookmark;
pub mod category;
pub mod chat_message;
pub mod comment;
pub mod like;
pub mod opinion;
pub mod report;
pub mod user;

pub use admin::{AdminRole, AdminStatus, Entity as Admin, Model as AdminModel};
pub use argu::{ArguStatus, Entity as Argu, Model as ArguModel};
pub use bookmark::Entity as Bookmark;
pub use category::{Entity as Category, Model as CategoryModel};
pub use chat_message::{Entity as ChatMessage, Model as ChatMessageModel};
pub use comment::{Entity as Comment, Model as CommentModel};
pub use like::Entity as Like;
pub use opinion::{Entity as Opinion, Model as OpinionModel, OpinionSide};
pub use report::{Entity as Report, Model as ReportModel, ReportStatus, ReportTargetType};
pub use user::{Entity as User, Model as UserModel, UserStatus};
