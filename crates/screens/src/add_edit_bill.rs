//! Add/edit bill form screen.

use chrono::{DateTime, Utc};
use common::EntityId;
use domain::{Bill, Money, validate};
use tokio::sync::{mpsc, watch};
use usecases::BillUseCases;

use crate::input::{DateState, TextFieldState};

/// Lifecycle phase of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    /// Fetching the existing record (or starting blank for "new").
    Loading,
    /// Accepting field edits; errors recomputed on every edit.
    Editing,
    /// A save intent is being processed.
    Submitting,
    /// The record was written; the screen should navigate away.
    Saved,
}

/// Snapshot of the add/edit bill form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddEditBillState {
    pub name: TextFieldState,
    pub description: TextFieldState,
    pub amount: TextFieldState,
    pub date: DateState,
    pub phase: FormPhase,
}

impl Default for AddEditBillState {
    fn default() -> Self {
        Self {
            name: TextFieldState::default(),
            description: TextFieldState::default(),
            amount: TextFieldState::default(),
            date: DateState::default(),
            phase: FormPhase::Loading,
        }
    }
}

impl AddEditBillState {
    /// True when any field currently carries an error.
    pub fn has_errors(&self) -> bool {
        self.name.error.is_some()
            || self.description.error.is_some()
            || self.amount.error.is_some()
            || self.date.error.is_some()
    }
}

/// Intents the presentation layer can emit for the form.
#[derive(Debug, Clone)]
pub enum AddEditBillEvent {
    EnteredName(String),
    EnteredDescription(String),
    EnteredAmount(String),
    EnteredDate(Option<DateTime<Utc>>),
    SaveBill,
}

/// One-shot notifications for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddEditBillNotice {
    /// Aggregate refusal or downgraded failure, shown as a message.
    ShowMessage(String),
    /// The bill was saved; the screen should navigate away.
    Saved,
}

const FIX_FIELDS_MESSAGE: &str = "Please fill all fields correctly";

/// State synchronizer for the add/edit bill form.
///
/// Loading an existing record runs the same field checks used for live
/// edits, so pre-existing invalid data is flagged immediately rather than
/// only at save time. The save intent re-runs every check as the
/// authoritative gate before the mutation use case is invoked.
pub struct AddEditBillModel {
    use_cases: BillUseCases,
    group_id: EntityId,
    bill_id: Option<EntityId>,
    state: watch::Sender<AddEditBillState>,
    notices: mpsc::UnboundedSender<AddEditBillNotice>,
}

impl AddEditBillModel {
    /// Creates the model, loading the record when `bill_id` is given.
    ///
    /// An unknown `bill_id` falls back to a blank "new" form.
    pub async fn new(
        use_cases: BillUseCases,
        group_id: EntityId,
        bill_id: Option<EntityId>,
    ) -> (Self, mpsc::UnboundedReceiver<AddEditBillNotice>) {
        let (notices, notices_rx) = mpsc::unbounded_channel();
        let (state, _) = watch::channel(AddEditBillState::default());
        let mut model = Self {
            use_cases,
            group_id,
            bill_id: None,
            state,
            notices,
        };
        model.load(bill_id).await;
        (model, notices_rx)
    }

    /// Read-only view of the form state.
    pub fn state(&self) -> watch::Receiver<AddEditBillState> {
        self.state.subscribe()
    }

    /// Dispatches a presentation intent.
    pub async fn handle(&mut self, event: AddEditBillEvent) {
        match event {
            AddEditBillEvent::EnteredName(value) => {
                let error = validate::check_text(
                    &value,
                    Bill::IS_NAME_REQUIRED,
                    Bill::MIN_NAME_LEN,
                    Bill::MAX_NAME_LEN,
                );
                self.state
                    .send_modify(|state| state.name = TextFieldState { value, error });
            }
            AddEditBillEvent::EnteredDescription(value) => {
                let error = validate::check_text(
                    &value,
                    Bill::IS_DESC_REQUIRED,
                    Bill::MIN_DESC_LEN,
                    Bill::MAX_DESC_LEN,
                );
                self.state
                    .send_modify(|state| state.description = TextFieldState { value, error });
            }
            AddEditBillEvent::EnteredAmount(value) => {
                let error = validate::check_decimal(
                    Money::parse(&value),
                    Bill::IS_AMOUNT_REQUIRED,
                    Bill::MAX_AMOUNT,
                );
                self.state
                    .send_modify(|state| state.amount = TextFieldState { value, error });
            }
            AddEditBillEvent::EnteredDate(value) => {
                let error = validate::check_date(value, Bill::IS_DATE_REQUIRED);
                self.state
                    .send_modify(|state| state.date = DateState { value, error });
            }
            AddEditBillEvent::SaveBill => self.save().await,
        }
    }

    async fn load(&mut self, bill_id: Option<EntityId>) {
        if let Some(id) = bill_id {
            match self.use_cases.get_bill_by_id(id).await {
                Ok(Some(bill)) => {
                    self.bill_id = bill.id;
                    self.state.send_modify(|state| {
                        state.name.value = bill.name;
                        if let Some(description) = bill.description {
                            state.description.value = description;
                        }
                        if let Some(amount) = bill.amount {
                            state.amount.value = amount.to_decimal_string();
                        }
                        state.date.value = bill.date;
                    });
                }
                Ok(None) => {
                    tracing::debug!(%id, "bill not found, starting blank form");
                }
                Err(error) => {
                    let _ = self
                        .notices
                        .send(AddEditBillNotice::ShowMessage(error.to_string()));
                }
            }
        }
        // Loaded values get the same checks as live edits, so records
        // persisted with invalid data are flagged before any keystroke.
        self.revalidate_all();
        self.state
            .send_modify(|state| state.phase = FormPhase::Editing);
    }

    fn revalidate_all(&self) {
        self.state.send_modify(|state| {
            state.name.error = validate::check_text(
                &state.name.value,
                Bill::IS_NAME_REQUIRED,
                Bill::MIN_NAME_LEN,
                Bill::MAX_NAME_LEN,
            );
            state.description.error = validate::check_text(
                &state.description.value,
                Bill::IS_DESC_REQUIRED,
                Bill::MIN_DESC_LEN,
                Bill::MAX_DESC_LEN,
            );
            state.amount.error = validate::check_decimal(
                Money::parse(&state.amount.value),
                Bill::IS_AMOUNT_REQUIRED,
                Bill::MAX_AMOUNT,
            );
            state.date.error = validate::check_date(state.date.value, Bill::IS_DATE_REQUIRED);
        });
    }

    async fn save(&mut self) {
        self.state
            .send_modify(|state| state.phase = FormPhase::Submitting);
        self.revalidate_all();

        let snapshot = self.state.borrow().clone();
        if snapshot.has_errors() {
            self.state
                .send_modify(|state| state.phase = FormPhase::Editing);
            let _ = self
                .notices
                .send(AddEditBillNotice::ShowMessage(FIX_FIELDS_MESSAGE.into()));
            return;
        }

        let description = snapshot.description.value.trim();
        let bill = Bill {
            id: self.bill_id,
            group_id: self.group_id,
            name: snapshot.name.value.trim().to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            amount: Money::parse(&snapshot.amount.value),
            date: snapshot.date.value,
        };

        match self.use_cases.upsert_bill(bill).await {
            Ok(id) => {
                self.bill_id = Some(id);
                self.state.send_modify(|state| state.phase = FormPhase::Saved);
                let _ = self.notices.send(AddEditBillNotice::Saved);
            }
            Err(error) => {
                // In-progress edits survive a failed save.
                self.state
                    .send_modify(|state| state.phase = FormPhase::Editing);
                let _ = self
                    .notices
                    .send(AddEditBillNotice::ShowMessage(error.to_string()));
            }
        }
    }
}
