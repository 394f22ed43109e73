//! Client core for the todo manager: session handling, the REST client and
//! the view-models a front end renders.

pub mod auth;
pub mod error;
pub mod profile;
pub mod remote;
pub mod session;
pub mod todo_list;

#[cfg(test)]
pub(crate) mod test_support;

pub use auth::{AuthService, Registration};
pub use error::ClientError;
pub use profile::ProfileViewModel;
pub use remote::{AuthApi, HttpApi, TodoApi, UserApi};
pub use session::{FileTokenStore, MemoryTokenStore, SessionContext, TokenStore};
pub use todo_list::{
    CreateForm, EditForm, FetchOutcome, ListView, SortColumn, SortDirection, SortState,
    TodoDraft, TodoListViewModel,
};
