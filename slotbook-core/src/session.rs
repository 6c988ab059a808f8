//! A schedule editing session for one agent.
//!
//! The session owns the loaded month, the weekly editor and the last saved
//! snapshot. Every successful save is followed by a fresh fetch, which
//! replaces all local state.

use chrono::{Local, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::calendar::{MonthGrid, YearMonth, project_month};
use crate::diff::{ChangeSet, ExtraSlotChanges, has_unsaved_changes};
use crate::editor::{ExtraSlotEditor, ScheduleEditor, WeekSchedule};
use crate::error::{SlotbookError, SlotbookResult};
use crate::extra::ExtraSlotIndex;
use crate::preferences::BookingPreferences;
use crate::remote::ScheduleClient;
use crate::remote::protocol::{SaveSchedule, ScheduleData};
use crate::schedule::{AggregatedSchedule, aggregate};

/// Source of "today", used to mark past dates.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// The real date, in the agent's timezone when one is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    pub timezone: Option<Tz>,
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        match self.timezone {
            Some(tz) => Utc::now().with_timezone(&tz).date_naive(),
            None => Local::now().date_naive(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Identifies one fetch. Only the most recently issued token may apply its
/// response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

/// Everything derived from one fetch.
#[derive(Debug, Clone)]
pub struct LoadedSchedule {
    pub month: YearMonth,
    pub aggregated: AggregatedSchedule,
    pub extras: ExtraSlotIndex,
    saved: WeekSchedule,
    editor: ScheduleEditor,
}

impl LoadedSchedule {
    fn new(month: YearMonth, data: &ScheduleData, prefs: &BookingPreferences) -> Self {
        let aggregated = aggregate(&data.time_schedules);
        let saved = WeekSchedule::from_aggregate(&aggregated);
        LoadedSchedule {
            month,
            extras: ExtraSlotIndex::from_records(&data.extra_slots),
            editor: ScheduleEditor::new(saved.clone(), prefs.clone()),
            saved,
            aggregated,
        }
    }

    /// The week as last loaded from the server.
    pub fn saved(&self) -> &WeekSchedule {
        &self.saved
    }
}

pub struct ScheduleSession<C: ScheduleClient, K: Clock = SystemClock> {
    client: C,
    clock: K,
    prefs: BookingPreferences,
    latest_request: u64,
    saving: bool,
    reload_required: bool,
    loaded: Option<LoadedSchedule>,
}

impl<C: ScheduleClient, K: Clock> ScheduleSession<C, K> {
    pub fn new(client: C, clock: K, prefs: BookingPreferences) -> Self {
        ScheduleSession {
            client,
            clock,
            prefs,
            latest_request: 0,
            saving: false,
            reload_required: false,
            loaded: None,
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn preferences(&self) -> &BookingPreferences {
        &self.prefs
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn loaded(&self) -> Option<&LoadedSchedule> {
        self.loaded.as_ref()
    }

    pub fn month(&self) -> Option<YearMonth> {
        self.loaded.as_ref().map(|l| l.month)
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn editor(&self) -> SlotbookResult<&ScheduleEditor> {
        self.loaded
            .as_ref()
            .map(|l| &l.editor)
            .ok_or(SlotbookError::NotLoaded)
    }

    pub fn editor_mut(&mut self) -> SlotbookResult<&mut ScheduleEditor> {
        self.loaded
            .as_mut()
            .map(|l| &mut l.editor)
            .ok_or(SlotbookError::NotLoaded)
    }

    /// Start a fetch. Any token issued earlier becomes stale.
    pub fn begin_fetch(&mut self) -> RequestToken {
        self.latest_request += 1;
        RequestToken(self.latest_request)
    }

    /// Apply a fetch result. Returns false, leaving state untouched, when a
    /// newer fetch has been started since `token` was issued.
    pub fn apply_fetch(
        &mut self,
        token: RequestToken,
        month: YearMonth,
        data: ScheduleData,
    ) -> bool {
        if token.0 != self.latest_request {
            tracing::warn!(
                month = %month,
                token = token.0,
                latest = self.latest_request,
                "discarding stale schedule response"
            );
            return false;
        }

        let loaded = LoadedSchedule::new(month, &data, &self.prefs);
        tracing::info!(
            month = %month,
            weekly = loaded.aggregated.active.total_slots(),
            inactive = loaded.aggregated.inactive.total_slots(),
            skipped = loaded.aggregated.skipped,
            extra_dates = loaded.extras.dates().count(),
            "schedule loaded"
        );
        self.loaded = Some(loaded);
        self.reload_required = false;
        true
    }

    /// Fetch and load one month. Unsaved edits are dropped.
    pub async fn load_month(&mut self, month: YearMonth) -> SlotbookResult<()> {
        let token = self.begin_fetch();
        let data = self.client.fetch_schedule(month.month, month.year).await?;
        self.apply_fetch(token, month, data);
        Ok(())
    }

    /// Load the month containing today.
    pub async fn load_current_month(&mut self) -> SlotbookResult<()> {
        self.load_month(YearMonth::of(self.clock.today())).await
    }

    pub async fn next_month(&mut self) -> SlotbookResult<()> {
        let month = self.month().ok_or(SlotbookError::NotLoaded)?;
        self.load_month(month.next()).await
    }

    pub async fn previous_month(&mut self) -> SlotbookResult<()> {
        let month = self.month().ok_or(SlotbookError::NotLoaded)?;
        self.load_month(month.previous()).await
    }

    /// Fetch the loaded month again.
    pub async fn reload(&mut self) -> SlotbookResult<()> {
        let month = self.month().ok_or(SlotbookError::NotLoaded)?;
        self.load_month(month).await
    }

    /// The loaded month laid out as a calendar, from the saved weekly slots.
    pub fn month_grid(&self) -> SlotbookResult<MonthGrid> {
        let loaded = self.loaded.as_ref().ok_or(SlotbookError::NotLoaded)?;
        project_month(
            loaded.month,
            &loaded.aggregated.active,
            &loaded.extras,
            self.clock.today(),
        )
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.loaded.as_ref().is_some_and(|l| {
            has_unsaved_changes(l.editor.week(), &l.saved, l.editor.deleted_slot_ids())
        })
    }

    pub fn change_set(&self) -> SlotbookResult<ChangeSet> {
        let loaded = self.loaded.as_ref().ok_or(SlotbookError::NotLoaded)?;
        Ok(ChangeSet::between(
            loaded.editor.week(),
            &loaded.saved,
            loaded.editor.deleted_slot_ids(),
        ))
    }

    /// Validate and build the save request, marking a save as in flight.
    ///
    /// Nothing is marked when this returns an error.
    pub fn begin_save(&mut self) -> SlotbookResult<SaveSchedule> {
        if self.saving {
            return Err(SlotbookError::SaveInFlight);
        }
        if self.reload_required {
            return Err(SlotbookError::ReloadRequired);
        }

        let loaded = self.loaded.as_ref().ok_or(SlotbookError::NotLoaded)?;
        let violations = loaded.editor.validate();
        if !violations.is_empty() {
            return Err(SlotbookError::Validation(violations));
        }

        let changes = ChangeSet::between(
            loaded.editor.week(),
            &loaded.saved,
            loaded.editor.deleted_slot_ids(),
        );
        let (created, updated, deleted) = changes.counts();
        tracing::debug!(created, updated, deleted, "saving weekly schedule");

        self.saving = true;
        Ok(changes.payload)
    }

    /// Record the outcome of a save started with [`begin_save`](Self::begin_save).
    ///
    /// On failure the edits stay as they are so the user can retry.
    pub fn finish_save(&mut self, result: SlotbookResult<()>) -> SlotbookResult<()> {
        self.saving = false;

        match result {
            Ok(()) => {
                if let Some(loaded) = self.loaded.as_mut() {
                    loaded.editor.clear_deleted();
                }
                self.reload_required = true;
                tracing::info!("weekly schedule saved");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "saving weekly schedule failed");
                Err(e)
            }
        }
    }

    /// Validate, save and reload the weekly schedule.
    pub async fn save(&mut self) -> SlotbookResult<()> {
        let request = self.begin_save()?;
        let result = self.client.save_schedule(&request).await;
        self.finish_save(result)?;
        self.reload().await
    }

    /// Editor for the extra slots of one date of the loaded month.
    pub fn extra_slot_editor(&self, date: NaiveDate) -> SlotbookResult<ExtraSlotEditor> {
        let loaded = self.loaded.as_ref().ok_or(SlotbookError::NotLoaded)?;
        Ok(ExtraSlotEditor::new(
            date,
            loaded.extras.for_date(date),
            self.prefs.clone(),
        ))
    }

    /// Save one date's extra slots: removals first, then additions.
    ///
    /// When removal succeeds and addition fails, the removal is recorded in
    /// `editor` and the loaded index, and the additions stay pending so a
    /// retry only sends them.
    pub async fn save_extra_slots(&mut self, editor: &mut ExtraSlotEditor) -> SlotbookResult<()> {
        if self.saving {
            return Err(SlotbookError::SaveInFlight);
        }
        if self.loaded.is_none() {
            return Err(SlotbookError::NotLoaded);
        }

        let violations = editor.validate();
        if !violations.is_empty() {
            return Err(SlotbookError::Validation(violations));
        }

        let changes = editor.changes();
        if changes.is_empty() {
            return Ok(());
        }

        self.saving = true;
        let result = self.send_extra_changes(editor, &changes).await;
        self.saving = false;

        match result {
            Ok(()) => {
                tracing::info!(date = %editor.date(), "extra slots saved");
                self.reload().await
            }
            Err(e) => {
                tracing::warn!(date = %editor.date(), error = %e, "saving extra slots failed");
                Err(e)
            }
        }
    }

    async fn send_extra_changes(
        &mut self,
        editor: &mut ExtraSlotEditor,
        changes: &ExtraSlotChanges,
    ) -> SlotbookResult<()> {
        if let Some(remove) = changes.remove_request() {
            self.client.remove_extra_slots(&remove).await?;
            editor.mark_removed(&changes.to_remove);

            if let Some(loaded) = self.loaded.as_mut() {
                let remaining = loaded
                    .extras
                    .for_date(changes.date)
                    .iter()
                    .filter(|s| {
                        s.id
                            .persisted()
                            .is_none_or(|id| !changes.to_remove.contains(&id))
                    })
                    .cloned()
                    .collect();
                loaded.extras.replace_date(changes.date, remaining);
            }
        }

        if let Some(add) = changes.add_request() {
            self.client.add_extra_slots(&add).await?;
        }

        Ok(())
    }
}
