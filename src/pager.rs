//! Pagination state machine.
//!
//! The pager decides which month to fetch next and folds results into the
//! [`MessageStore`]. It never performs I/O: `request_more` and
//! `select_month` hand out a [`FetchTicket`], the caller runs the fetch and
//! reports back through [`Pager::complete`].

use crate::feeds::{FetchError, Message};
use crate::months::{MonthSequence, YearMonth};
use crate::store::MessageStore;
use serde::{Deserialize, Serialize};

/// What an empty or failed page means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ExhaustionPolicy {
    /// The archive has ended. No further pages this session.
    #[default]
    PerPage,
    /// The month is done. Move on to the next month: a fresh list when the
    /// shown month failed, or the next continuation page when an older one did.
    AdvanceMonth,
}

impl ExhaustionPolicy {
    pub fn label(self) -> &'static str {
        match self {
            Self::PerPage => "per-page",
            Self::AdvanceMonth => "advance-month",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerState {
    Idle,
    Loading,
    Exhausted,
}

/// An issued fetch. Results are only accepted for the ticket in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub month: YearMonth,
    generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The page was added; `count` is how many messages survived filtering.
    Appended { count: usize },
    /// The month was skipped and a fetch for the following month is due.
    Refetch(FetchTicket),
    Exhausted,
    /// The result belonged to a fetch that is no longer current.
    Stale,
}

#[derive(Debug)]
pub struct Pager {
    months: MonthSequence,
    policy: ExhaustionPolicy,
    store: MessageStore,
    state: PagerState,
    current_month: Option<YearMonth>,
    cursor: Option<YearMonth>,
    generation: u64,
    in_flight: Option<FetchTicket>,
    last_error: Option<String>,
}

impl Pager {
    pub fn new(months: MonthSequence, policy: ExhaustionPolicy) -> Self {
        let first = months.first();
        Self {
            months,
            policy,
            store: MessageStore::new(),
            state: PagerState::Idle,
            current_month: first,
            cursor: first,
            generation: 0,
            in_flight: None,
            last_error: None,
        }
    }

    /// Ask for the next page. Returns `None` while a fetch is in flight,
    /// once exhausted, or when there is no month left to ask for.
    pub fn request_more(&mut self) -> Option<FetchTicket> {
        if self.state != PagerState::Idle {
            return None;
        }
        match self.cursor {
            Some(month) => Some(self.issue(month)),
            None => {
                tracing::info!("no months left, pagination exhausted");
                self.state = PagerState::Exhausted;
                None
            }
        }
    }

    /// Jump to `month` from any state and fetch it immediately.
    pub fn select_month(&mut self, month: YearMonth) -> FetchTicket {
        tracing::info!(%month, "month selected");
        self.start_month(month);
        self.last_error = None;
        self.issue(month)
    }

    /// Fold a fetch result back in.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<Message>, FetchError>,
    ) -> Completion {
        if self.in_flight != Some(ticket) {
            tracing::debug!(month = %ticket.month, "discarding stale page");
            return Completion::Stale;
        }
        self.in_flight = None;

        match result {
            Ok(page) if !page.is_empty() => {
                let received = page.len();
                let count = self.store.append(page);
                self.cursor = self.months.next_after(ticket.month);
                self.state = PagerState::Idle;
                self.last_error = None;
                tracing::info!(month = %ticket.month, received, kept = count, "page appended");
                Completion::Appended { count }
            }
            Ok(_) => {
                tracing::info!(month = %ticket.month, "empty page");
                self.page_failed(ticket.month)
            }
            Err(err) => {
                tracing::warn!(month = %ticket.month, kind = err.kind(), error = %err, "page failed");
                self.last_error = Some(err.to_string());
                self.page_failed(ticket.month)
            }
        }
    }

    fn page_failed(&mut self, month: YearMonth) -> Completion {
        match self.policy {
            ExhaustionPolicy::PerPage => {
                self.state = PagerState::Exhausted;
                Completion::Exhausted
            }
            ExhaustionPolicy::AdvanceMonth => match self.months.next_after(month) {
                // An older month appended below the shown one came back
                // empty: skip it and keep what is already loaded.
                Some(next) if self.current_month != Some(month) => {
                    tracing::info!(from = %month, to = %next, "skipping continuation month");
                    self.cursor = Some(next);
                    Completion::Refetch(self.issue(next))
                }
                Some(next) => {
                    tracing::info!(from = %month, to = %next, "advancing month");
                    self.start_month(next);
                    Completion::Refetch(self.issue(next))
                }
                None => {
                    self.cursor = None;
                    self.state = PagerState::Exhausted;
                    Completion::Exhausted
                }
            },
        }
    }

    fn start_month(&mut self, month: YearMonth) {
        self.generation += 1;
        self.in_flight = None;
        self.store.reset();
        self.current_month = Some(month);
        self.cursor = Some(month);
        self.state = PagerState::Idle;
    }

    fn issue(&mut self, month: YearMonth) -> FetchTicket {
        let ticket = FetchTicket {
            month,
            generation: self.generation,
        };
        self.state = PagerState::Loading;
        self.in_flight = Some(ticket);
        tracing::debug!(%month, generation = self.generation, "fetch issued");
        ticket
    }

    pub fn state(&self) -> PagerState {
        self.state
    }

    pub fn has_more(&self) -> bool {
        self.state != PagerState::Exhausted
    }

    pub fn current_month(&self) -> Option<YearMonth> {
        self.current_month
    }

    pub fn policy(&self) -> ExhaustionPolicy {
        self.policy
    }

    pub fn months(&self) -> &MonthSequence {
        &self.months
    }

    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    /// Description of the most recent failed page, cleared by the next success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
