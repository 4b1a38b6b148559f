//! Host view: owns the list view and at most one open dialog at a time.

use std::sync::Arc;

use tracing::debug;

use crate::{
    error::WorkflowError,
    listing::CustomerList,
    service::CustomerService,
    workflows::{
        CreateWorkflow, DeleteWorkflow, LookupWorkflow, UpdateWorkflow, Workflow, WorkflowKind,
    },
};

pub enum Dialog {
    Create(CreateWorkflow),
    Lookup(LookupWorkflow),
    Update(UpdateWorkflow),
    Delete(DeleteWorkflow),
}

impl Dialog {
    fn open(kind: WorkflowKind, service: Arc<dyn CustomerService>) -> Self {
        match kind {
            WorkflowKind::Create => Self::Create(CreateWorkflow::new(service)),
            WorkflowKind::Lookup => Self::Lookup(LookupWorkflow::new(service)),
            WorkflowKind::Update => Self::Update(UpdateWorkflow::new(service)),
            WorkflowKind::Delete => Self::Delete(DeleteWorkflow::new(service)),
        }
    }

    pub fn workflow(&self) -> &dyn Workflow {
        match self {
            Self::Create(workflow) => workflow,
            Self::Lookup(workflow) => workflow,
            Self::Update(workflow) => workflow,
            Self::Delete(workflow) => workflow,
        }
    }

    pub fn workflow_mut(&mut self) -> &mut dyn Workflow {
        match self {
            Self::Create(workflow) => workflow,
            Self::Lookup(workflow) => workflow,
            Self::Update(workflow) => workflow,
            Self::Delete(workflow) => workflow,
        }
    }

    pub fn kind(&self) -> WorkflowKind {
        self.workflow().kind()
    }
}

pub struct DialogHost {
    service: Arc<dyn CustomerService>,
    active: Option<Dialog>,
    list: CustomerList,
    list_visible: bool,
}

macro_rules! open_dialog {
    ($fn_name:ident, $variant:ident, $ty:ty) => {
        pub fn $fn_name(&mut self) -> &mut $ty {
            match self.open(WorkflowKind::$variant) {
                Dialog::$variant(workflow) => workflow,
                _ => unreachable!("open() builds the requested dialog kind"),
            }
        }
    };
}

impl DialogHost {
    pub fn new(service: Arc<dyn CustomerService>, page_size: usize) -> Self {
        Self {
            service,
            active: None,
            list: CustomerList::new(page_size),
            list_visible: false,
        }
    }

    /// Opens a fresh dialog of `kind`, dropping whichever dialog was open.
    pub fn open(&mut self, kind: WorkflowKind) -> &mut Dialog {
        self.close();
        debug!(?kind, "host: opening dialog");
        self.active.insert(Dialog::open(kind, Arc::clone(&self.service)))
    }

    open_dialog!(open_create, Create, CreateWorkflow);
    open_dialog!(open_lookup, Lookup, LookupWorkflow);
    open_dialog!(open_update, Update, UpdateWorkflow);
    open_dialog!(open_delete, Delete, DeleteWorkflow);

    pub fn close(&mut self) {
        if let Some(mut dialog) = self.active.take() {
            debug!(kind = ?dialog.kind(), "host: closing dialog");
            dialog.workflow_mut().close();
        }
    }

    /// Open/close switch as bound to the host's menu buttons.
    pub fn toggle(&mut self, kind: WorkflowKind) -> bool {
        if self.is_open(kind) {
            self.close();
            false
        } else {
            self.open(kind);
            true
        }
    }

    pub fn is_open(&self, kind: WorkflowKind) -> bool {
        self.active.as_ref().map(Dialog::kind) == Some(kind)
    }

    pub fn active(&self) -> Option<&Dialog> {
        self.active.as_ref()
    }

    pub fn active_mut(&mut self) -> Option<&mut Dialog> {
        self.active.as_mut()
    }

    /// Makes the list view visible and re-fetches its contents.
    pub async fn show_list(&mut self) -> Result<usize, WorkflowError> {
        self.list_visible = true;
        self.list.refresh(self.service.as_ref()).await
    }

    pub fn hide_list(&mut self) {
        self.list_visible = false;
    }

    pub fn is_list_visible(&self) -> bool {
        self.list_visible
    }

    pub fn list(&self) -> &CustomerList {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut CustomerList {
        &mut self.list
    }
}

#[cfg(test)]
#[path = "tests/host_tests.rs"]
mod tests;
