mod add;
mod helpers;
mod list;
mod manage;
mod transfer;

use larder_core::db::Database;
use larder_core::service::LarderService;

pub(crate) use add::{AddArgs, cmd_add};
pub(crate) use list::{cmd_categories, cmd_list};
pub(crate) use manage::{cmd_bought, cmd_clear, cmd_delete, cmd_toggle};
pub(crate) use transfer::{cmd_export, cmd_import};

pub(crate) type Service = LarderService<Database>;
