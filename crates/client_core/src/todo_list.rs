//! In-memory todo list view-model.
//!
//! The cached collection is only replaced by a successful fetch. Every
//! mutation goes to the remote first and is followed by a full refetch.

use std::{cmp::Ordering, fmt, str::FromStr, sync::Arc};

use shared::{
    domain::{Todo, TodoId, TodoStatus},
    protocol::{NewTodoRequest, UpdateTodoRequest},
};
use tracing::{debug, info, warn};

use crate::{error::ClientError, remote::TodoApi, session::SessionContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortColumn {
    Id,
    Title,
    Description,
    CreatedAt,
    DueTime,
    Status,
}

impl SortColumn {
    pub const ALL: [SortColumn; 6] = [
        SortColumn::Id,
        SortColumn::Title,
        SortColumn::Description,
        SortColumn::CreatedAt,
        SortColumn::DueTime,
        SortColumn::Status,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Title => "title",
            Self::Description => "description",
            Self::CreatedAt => "created_at",
            Self::DueTime => "due_time",
            Self::Status => "status",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Title => "Title",
            Self::Description => "Description",
            Self::CreatedAt => "Created At",
            Self::DueTime => "Due Time",
            Self::Status => "Status",
        }
    }

    /// Raw field text used for ordering.
    pub fn key(self, todo: &Todo) -> &str {
        match self {
            Self::Id => todo.id.as_str(),
            Self::Title => &todo.title,
            Self::Description => &todo.description,
            Self::CreatedAt => &todo.created_at,
            Self::DueTime => &todo.due_time,
            Self::Status => todo.status.as_str(),
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortColumn {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Self::ALL
            .into_iter()
            .find(|column| column.as_str() == normalized)
            .ok_or_else(|| {
                format!(
                    "unknown column '{value}', expected one of: {}",
                    Self::ALL.map(SortColumn::as_str).join(", ")
                )
            })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            column: SortColumn::Id,
            direction: SortDirection::Asc,
        }
    }
}

impl SortState {
    /// Same column flips direction; a new column starts ascending.
    pub fn select(&mut self, column: SortColumn) {
        if column == self.column {
            self.direction = self.direction.toggled();
        } else {
            self.column = column;
            self.direction = SortDirection::Asc;
        }
    }
}

/// Stable ordering by raw string comparison of the active column.
pub fn sort_todos(todos: &[Todo], sort: SortState) -> Vec<&Todo> {
    let mut sorted: Vec<&Todo> = todos.iter().collect();
    sorted.sort_by(|a, b| {
        sort.direction
            .apply(sort.column.key(a).cmp(sort.column.key(b)))
    });
    sorted
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoDraft {
    pub title: String,
    pub description: String,
    pub status: TodoStatus,
    pub due_time: String,
}

impl TodoDraft {
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.title.trim().is_empty() || self.due_time.trim().is_empty() {
            return Err(ClientError::required_fields());
        }
        Ok(())
    }

    /// Draft after a failed create: only the due time survives.
    fn reset_keeping_due_time(&self) -> Self {
        Self {
            due_time: self.due_time.clone(),
            ..Self::default()
        }
    }
}

impl From<&Todo> for TodoDraft {
    fn from(todo: &Todo) -> Self {
        Self {
            title: todo.title.clone(),
            description: todo.description.clone(),
            status: todo.status,
            due_time: todo.due_time.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateForm {
    pub open: bool,
    pub draft: TodoDraft,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditForm {
    pub id: TodoId,
    pub original: TodoDraft,
    pub fields: TodoDraft,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// No token; collection emptied and no request issued.
    SignedOut,
    Replaced { count: usize },
    /// Request failed; the previous collection is kept.
    Kept,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ListView<'a> {
    SignInRequired,
    Table(Vec<&'a Todo>),
}

pub struct TodoListViewModel {
    api: Arc<dyn TodoApi>,
    session: SessionContext,
    todos: Vec<Todo>,
    sort: SortState,
    create_form: CreateForm,
    edit_form: Option<EditForm>,
    pending_delete: Option<TodoId>,
}

impl TodoListViewModel {
    pub fn new(api: Arc<dyn TodoApi>, session: SessionContext) -> Self {
        Self {
            api,
            session,
            todos: Vec::new(),
            sort: SortState::default(),
            create_form: CreateForm::default(),
            edit_form: None,
            pending_delete: None,
        }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn find(&self, id: &TodoId) -> Option<&Todo> {
        self.todos.iter().find(|todo| &todo.id == id)
    }

    pub async fn fetch_all(&mut self) -> FetchOutcome {
        let token = match self.session.require_token() {
            Ok(token) => token,
            Err(_) => {
                self.todos.clear();
                debug!("todo fetch skipped: signed out");
                return FetchOutcome::SignedOut;
            }
        };

        match self.api.list_todos(&token).await {
            Ok(todos) => {
                let count = todos.len();
                self.todos = todos;
                debug!(count, "todo collection replaced");
                FetchOutcome::Replaced { count }
            }
            Err(err) => {
                debug!(error = %err, "todo fetch failed; keeping cached collection");
                FetchOutcome::Kept
            }
        }
    }

    pub fn sort_by(&mut self, column: SortColumn) {
        self.sort.select(column);
    }

    pub fn sort_state(&self) -> SortState {
        self.sort
    }

    /// Direction arrow for `column` when it is the active one.
    pub fn sort_indicator(&self, column: SortColumn) -> Option<SortDirection> {
        (self.sort.column == column).then_some(self.sort.direction)
    }

    pub fn sorted(&self) -> Vec<&Todo> {
        sort_todos(&self.todos, self.sort)
    }

    pub fn view(&self) -> ListView<'_> {
        if self.session.is_authenticated() {
            ListView::Table(self.sorted())
        } else {
            ListView::SignInRequired
        }
    }

    pub fn create_form(&self) -> &CreateForm {
        &self.create_form
    }

    pub fn open_create(&mut self) {
        self.create_form.open = true;
    }

    pub fn close_create(&mut self) {
        self.create_form = CreateForm::default();
    }

    pub fn create_draft_mut(&mut self) -> &mut TodoDraft {
        &mut self.create_form.draft
    }

    pub async fn submit_create(&mut self) -> Result<(), ClientError> {
        let draft = self.create_form.draft.clone();
        self.create_todo(draft).await
    }

    pub async fn create_todo(&mut self, draft: TodoDraft) -> Result<(), ClientError> {
        if let Err(err) = draft.validate() {
            self.create_form.draft = draft;
            self.create_form.error = Some(err.display_message());
            return Err(err);
        }
        let Ok(token) = self.session.require_token() else {
            debug!("create skipped: signed out");
            return Ok(());
        };

        let result: Result<(), ClientError> = async {
            let owner = self.api.current_user(&token).await?;
            let request = NewTodoRequest {
                title: draft.title.clone(),
                description: draft.description.clone(),
                due_time: draft.due_time.clone(),
                status: draft.status,
                user_id: owner.id,
            };
            self.api.create_todo(&token, &request).await
        }
        .await;

        match result {
            Ok(()) => {
                info!(title = %draft.title, "todo created");
                self.fetch_all().await;
                self.close_create();
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "todo create failed");
                self.create_form.draft = draft.reset_keeping_due_time();
                self.create_form.error = Some(err.display_message());
                Err(err)
            }
        }
    }

    pub fn edit_form(&self) -> Option<&EditForm> {
        self.edit_form.as_ref()
    }

    pub fn open_edit(&mut self, id: &TodoId) -> Result<(), ClientError> {
        let todo = self
            .find(id)
            .ok_or_else(|| ClientError::Validation(format!("unknown todo {id}")))?;
        let original = TodoDraft::from(todo);
        self.edit_form = Some(EditForm {
            id: id.clone(),
            fields: original.clone(),
            original,
            error: None,
        });
        Ok(())
    }

    pub fn close_edit(&mut self) {
        self.edit_form = None;
    }

    pub fn edit_fields_mut(&mut self) -> Option<&mut TodoDraft> {
        self.edit_form.as_mut().map(|form| &mut form.fields)
    }

    pub async fn submit_edit(&mut self) -> Result<(), ClientError> {
        let Some(form) = self.edit_form.as_ref() else {
            return Err(ClientError::Validation("no todo is being edited".into()));
        };
        let id = form.id.clone();
        let fields = form.fields.clone();
        self.update_todo(id, fields).await
    }

    pub async fn update_todo(&mut self, id: TodoId, patch: TodoDraft) -> Result<(), ClientError> {
        if let Err(err) = patch.validate() {
            self.record_edit_failure(&id, &err);
            return Err(err);
        }
        let Ok(token) = self.session.require_token() else {
            debug!("update skipped: signed out");
            return Ok(());
        };

        let request = UpdateTodoRequest {
            id: id.clone(),
            title: patch.title,
            description: patch.description,
            status: patch.status,
            due_time: patch.due_time,
        };
        match self.api.update_todo(&token, &request).await {
            Ok(()) => {
                info!(todo_id = %id, "todo updated");
                if self.is_editing(&id) {
                    self.edit_form = None;
                }
                self.fetch_all().await;
                Ok(())
            }
            Err(err) => {
                warn!(todo_id = %id, error = %err, "todo update failed");
                self.record_edit_failure(&id, &err);
                Err(err)
            }
        }
    }

    fn is_editing(&self, id: &TodoId) -> bool {
        self.edit_form.as_ref().is_some_and(|form| &form.id == id)
    }

    fn record_edit_failure(&mut self, id: &TodoId, err: &ClientError) {
        if let Some(form) = self.edit_form.as_mut().filter(|form| &form.id == id) {
            if !err.is_validation() {
                form.fields = form.original.clone();
            }
            form.error = Some(err.display_message());
        }
    }

    pub fn pending_delete(&self) -> Option<&TodoId> {
        self.pending_delete.as_ref()
    }

    pub fn request_delete(&mut self, id: TodoId) {
        self.pending_delete = Some(id);
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    pub async fn confirm_delete(&mut self) -> Option<FetchOutcome> {
        let id = self.pending_delete.clone()?;
        Some(self.delete_todo(id).await)
    }

    /// Delete outcomes are not reported; the list is refreshed either way.
    pub async fn delete_todo(&mut self, id: TodoId) -> FetchOutcome {
        if let Ok(token) = self.session.require_token() {
            match self.api.delete_todo(&token, &id).await {
                Ok(()) => info!(todo_id = %id, "todo deleted"),
                Err(err) => warn!(todo_id = %id, error = %err, "todo delete failed"),
            }
        }
        self.pending_delete = None;
        self.fetch_all().await
    }
}

#[cfg(test)]
#[path = "tests/todo_list_tests.rs"]
mod tests;
