//! View router: the single owner of the current screen and last submission.
//!
//! Every submit-type action runs its side effects in a fixed order:
//!
//! ```text
//! 1. set the last-result slot (clearing the others)
//! 2. remote database write (best effort, failures logged)
//! 3. build and append the history record
//! 4. persist the history
//! 5. transition the view
//! 6. open the deep link
//! ```
//!
//! Only local work is on the critical path. Outbound failures are logged and
//! degrade content; they never stop the flow.

use std::sync::Arc;
use std::time::Duration;

use dispatch::templates::{booking_message, emergency_message, review_message};
use dispatch::{
    mailto_link, whatsapp_link, LinkOpener, LocationResolver, LoggingOpener,
    BOOKING_EMAIL, BOOKING_EMAIL_SUBJECT, DEFAULT_BUSINESS_NUMBER,
};
use rescue_core::{
    BookingKind, Clock, EmergencyRequest, RepairRecord, ReviewRequest, ServiceId,
    ServiceRequest, SystemClock, UserProfile, View,
};
use session_store::SessionStore;
use supabase_client::{
    EmergencyRow, OrderRow, RemoteDatabase, ReviewRow, UnconfiguredDatabase, UserRow,
};
use tire_vision::{AnalyzerChain, RimDesigner};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::error::{AppError, Result};
use crate::history;

/// Shown when rim design is picked but not enabled.
pub const RIM_DESIGN_COMING_SOON: &str = "AI 輪圈改色功能即將推出，敬請期待。";

/// Acknowledgment for dashboard entries without a screen of their own.
pub fn inquiry_acknowledgment(id: &str) -> String {
    format!("已收到您的「{}」查詢，客服將會聯絡您。", id)
}

/// The most recent submission. Only one is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LastResult {
    Emergency(EmergencyRequest),
    Booking(ServiceRequest),
    Review(ReviewRequest),
}

/// Screen state machine over the persisted session.
pub struct ViewRouter {
    store: Arc<dyn SessionStore>,
    database: Arc<dyn RemoteDatabase>,
    opener: Arc<dyn LinkOpener>,
    resolver: LocationResolver,
    analyzer: Arc<AnalyzerChain>,
    rim_designer: Option<Arc<dyn RimDesigner>>,
    clock: Arc<dyn Clock>,
    config: AppConfig,
    business_number: String,

    view: View,
    last_result: Option<LastResult>,
    phone: Option<String>,
    profile: Option<UserProfile>,
    history: Vec<RepairRecord>,
    /// Remote id of the emergency request awaiting its location.
    emergency_id: Option<String>,
    /// Deep links scheduled to open later.
    scheduled: Vec<JoinHandle<()>>,
}

impl ViewRouter {
    /// Start building a router over the given store.
    pub fn builder(store: Arc<dyn SessionStore>) -> ViewRouterBuilder {
        ViewRouterBuilder::new(store)
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn last_result(&self) -> Option<&LastResult> {
        self.last_result.as_ref()
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    /// History in insertion order, newest first.
    pub fn history(&self) -> &[RepairRecord] {
        &self.history
    }

    pub fn analyzer(&self) -> &AnalyzerChain {
        &self.analyzer
    }

    pub fn resolver(&self) -> &LocationResolver {
        &self.resolver
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn rim_design_enabled(&self) -> bool {
        self.rim_designer.is_some()
    }

    /// Dashboard entries in display order.
    pub fn dashboard(&self) -> Vec<ServiceId> {
        let mut entries = ServiceId::DASHBOARD.to_vec();
        if self.rim_design_enabled() {
            entries.push(ServiceId::RimDesign);
        }
        entries
    }

    fn require(&self, views: &[View], action: &'static str) -> Result<()> {
        if views.contains(&self.view) {
            Ok(())
        } else {
            Err(AppError::InvalidTransition {
                view: self.view,
                action,
            })
        }
    }

    fn transition(&mut self, to: View) {
        info!("View {} -> {}", self.view, to);
        self.view = to;
    }

    fn registered_phone(&self) -> Result<String> {
        self.phone.clone().ok_or(AppError::NotRegistered)
    }

    /// Phone number verified at registration.
    pub async fn verified(&mut self, phone: &str) -> Result<()> {
        self.require(&[View::Registration], "verify")?;

        if let Err(e) = self.store.set_phone(phone).await {
            warn!("Failed to persist phone: {}", e);
        }
        self.phone = Some(phone.to_string());

        if self.database.is_configured() {
            if let Err(e) = self.database.upsert_user(&UserRow::verified(phone)).await {
                warn!("Failed to register user remotely: {}", e);
            }
        }

        let next = if self.profile.is_some() {
            View::Dashboard
        } else {
            View::UserProfile
        };
        self.transition(next);
        Ok(())
    }

    /// Profile completed or replaced.
    pub async fn save_profile(&mut self, profile: UserProfile) -> Result<()> {
        self.require(&[View::UserProfile], "save profile")?;

        if let Err(e) = self.store.set_profile(&profile).await {
            warn!("Failed to persist profile: {}", e);
        }
        if self.database.is_configured() {
            if let Err(e) = self.database.upsert_user(&UserRow::from(&profile)).await {
                warn!("Failed to save profile remotely: {}", e);
            }
        }

        info!("Profile saved for {}", profile.phone_number);
        self.profile = Some(profile);
        self.transition(View::Dashboard);
        Ok(())
    }

    /// Dashboard selection by service id.
    ///
    /// Returns an inline acknowledgment when the id has no screen; the view
    /// does not change in that case.
    pub fn select_service(&mut self, id: &str) -> Result<Option<String>> {
        self.require(&[View::Dashboard], "select service")?;

        let next = match ServiceId::parse(id) {
            Some(ServiceId::EmergencyFlat) => View::EmergencyForm,
            Some(ServiceId::TireChange) => View::ServiceForm,
            Some(ServiceId::Repair) => View::RepairLocation,
            Some(ServiceId::OilChange) => View::MaintenanceForm,
            Some(ServiceId::Review) => View::ReviewForm,
            Some(ServiceId::History) => View::RepairHistory,
            Some(ServiceId::RimDesign) if self.rim_design_enabled() => View::RimDesign,
            Some(ServiceId::RimDesign) => {
                return Ok(Some(RIM_DESIGN_COMING_SOON.to_string()));
            }
            Some(ServiceId::Inspection) | None => {
                info!("Inquiry for {:?}", id);
                return Ok(Some(inquiry_acknowledgment(id.trim())));
            }
        };

        self.transition(next);
        Ok(None)
    }

    /// Emergency form submitted. The request waits for its location.
    ///
    /// The remote row is inserted once per request; submitting again after
    /// an edit keeps the row from the first submit.
    pub async fn submit_emergency(&mut self, request: EmergencyRequest) -> Result<()> {
        self.require(&[View::EmergencyForm], "submit emergency")?;
        let phone = self.registered_phone()?;

        self.last_result = Some(LastResult::Emergency(request.clone()));

        if let Some(id) = &self.emergency_id {
            info!("Emergency request {} already stored, keeping it", id);
        } else if self.database.is_configured() {
            let row = EmergencyRow::from_request(&phone, &request);
            match self.database.insert_emergency_request(&row).await {
                Ok(id) => {
                    info!("Emergency request {} stored", id);
                    self.emergency_id = Some(id);
                }
                Err(e) => warn!("Failed to store emergency request: {}", e),
            }
        }

        self.transition(View::EmergencyLocationStep);
        Ok(())
    }

    /// Back from the location step to edit the request.
    pub fn edit_emergency(&mut self) -> Result<()> {
        self.require(&[View::EmergencyLocationStep], "edit emergency")?;
        self.transition(View::EmergencyForm);
        Ok(())
    }

    /// Send the location for the pending emergency request.
    ///
    /// Returns the WhatsApp link that was opened.
    pub async fn send_location(&mut self) -> Result<String> {
        self.require(&[View::EmergencyLocationStep], "send location")?;
        let request = match &self.last_result {
            Some(LastResult::Emergency(request)) => request.clone(),
            _ => {
                return Err(AppError::InvalidTransition {
                    view: self.view,
                    action: "send location without a request",
                })
            }
        };

        let fix = self.resolver.resolve().await;
        debug!("Emergency location: {:?}", fix);
        let message = emergency_message(&request, self.phone.as_deref(), &fix);
        let link = whatsapp_link(&self.business_number, &message);

        if let Some(id) = self.emergency_id.take() {
            if let Err(e) = self.database.mark_location_sent(&id).await {
                warn!("Failed to mark location sent for {}: {}", id, e);
            }
        }

        self.append_record(RepairRecord::emergency(&request, self.clock.as_ref()))
            .await;
        self.transition(View::Success);
        self.open(&link).await;
        Ok(link)
    }

    /// Tire change or maintenance booking submitted.
    pub async fn submit_booking(&mut self, request: ServiceRequest) -> Result<()> {
        let view = match request.kind {
            BookingKind::TireChange => View::ServiceForm,
            BookingKind::Maintenance => View::MaintenanceForm,
        };
        self.require(&[view], "submit booking")?;
        let phone = self.registered_phone()?;

        self.last_result = Some(LastResult::Booking(request.clone()));

        if self.database.is_configured() {
            match self
                .database
                .insert_order(&OrderRow::from_booking(&phone, &request))
                .await
            {
                Ok(id) => info!("Order {} stored", id),
                Err(e) => warn!("Failed to store order: {}", e),
            }
        }

        self.append_record(RepairRecord::booking(&request, self.clock.as_ref()))
            .await;
        self.transition(View::Success);

        let message = booking_message(&request);
        self.open(&whatsapp_link(&self.business_number, &message))
            .await;
        if request.kind == BookingKind::TireChange {
            let mailto = mailto_link(BOOKING_EMAIL, BOOKING_EMAIL_SUBJECT, &message);
            self.open_later(mailto, self.config.mailto_delay);
        }
        Ok(())
    }

    /// Review submitted. The notification link opens after a delay.
    pub async fn submit_review(&mut self, review: ReviewRequest) -> Result<()> {
        self.require(&[View::ReviewForm], "submit review")?;

        self.last_result = Some(LastResult::Review(review.clone()));

        if self.database.is_configured() {
            let row = ReviewRow::from_review(self.profile.as_ref(), &review);
            if let Err(e) = self.database.insert_review(&row).await {
                warn!("Failed to store review: {}", e);
            }
        }

        self.transition(View::Success);

        let message = review_message(self.profile.as_ref(), &review);
        let link = whatsapp_link(&self.business_number, &message);
        self.open_later(link, self.config.review_link_delay);
        Ok(())
    }

    /// Restyle the rims in a photo.
    pub async fn design_rims(&self, photo: &str, style: &str) -> Result<Option<String>> {
        self.require(&[View::RimDesign], "design rims")?;
        let designer = self
            .rim_designer
            .as_ref()
            .ok_or(AppError::RimDesignDisabled)?;
        Ok(designer.generate(photo, style).await?)
    }

    /// Leave a form without submitting.
    pub fn cancel(&mut self) -> Result<()> {
        if !self.view.is_form() {
            return Err(AppError::InvalidTransition {
                view: self.view,
                action: "cancel",
            });
        }
        self.emergency_id = None;
        self.transition(View::Dashboard);
        Ok(())
    }

    /// Return to the dashboard from a result or information screen.
    pub fn back(&mut self) -> Result<()> {
        self.require(
            &[
                View::Success,
                View::RepairHistory,
                View::RepairLocation,
                View::RimDesign,
            ],
            "back",
        )?;
        self.transition(View::Dashboard);
        Ok(())
    }

    /// Forget the user. History is kept unless configured otherwise.
    pub async fn logout(&mut self) -> Result<()> {
        self.require(&[View::Dashboard], "logout")?;

        if let Err(e) = self.store.clear_user().await {
            warn!("Failed to clear stored user: {}", e);
        }
        if self.config.clear_history_on_logout {
            self.history.clear();
            self.persist_history().await;
        }

        info!("Logged out {}", self.phone.as_deref().unwrap_or("-"));
        self.phone = None;
        self.profile = None;
        self.last_result = None;
        self.emergency_id = None;
        self.transition(View::Registration);
        Ok(())
    }

    /// Wait for scheduled links to open.
    pub async fn flush_links(&mut self) {
        for handle in self.scheduled.drain(..) {
            if let Err(e) = handle.await {
                warn!("Scheduled link task failed: {}", e);
            }
        }
    }

    async fn append_record(&mut self, record: RepairRecord) {
        info!("History record {} added", record.id);
        history::prepend(&mut self.history, record);
        self.persist_history().await;
    }

    async fn persist_history(&self) {
        if let Err(e) = self.store.set_history(&self.history).await {
            warn!("Failed to persist history: {}", e);
        }
    }

    async fn open(&self, link: &str) {
        if let Err(e) = self.opener.open(link).await {
            warn!("Failed to open link: {}", e);
        }
    }

    fn open_later(&mut self, link: String, delay: Duration) {
        let opener = self.opener.clone();
        self.scheduled.retain(|handle| !handle.is_finished());
        self.scheduled.push(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = opener.open(&link).await {
                warn!("Failed to open link: {}", e);
            }
        }));
    }
}

/// Builder for ViewRouter.
pub struct ViewRouterBuilder {
    store: Arc<dyn SessionStore>,
    database: Arc<dyn RemoteDatabase>,
    opener: Arc<dyn LinkOpener>,
    resolver: LocationResolver,
    analyzer: Arc<AnalyzerChain>,
    rim_designer: Option<Arc<dyn RimDesigner>>,
    clock: Arc<dyn Clock>,
    config: AppConfig,
    business_number: String,
}

impl ViewRouterBuilder {
    fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            database: Arc::new(UnconfiguredDatabase),
            opener: Arc::new(LoggingOpener),
            resolver: LocationResolver::unavailable(),
            analyzer: Arc::new(AnalyzerChain::disabled()),
            rim_designer: None,
            clock: Arc::new(SystemClock),
            config: AppConfig::default(),
            business_number: DEFAULT_BUSINESS_NUMBER.to_string(),
        }
    }

    pub fn database(mut self, database: Arc<dyn RemoteDatabase>) -> Self {
        self.database = database;
        self
    }

    pub fn opener(mut self, opener: Arc<dyn LinkOpener>) -> Self {
        self.opener = opener;
        self
    }

    pub fn resolver(mut self, resolver: LocationResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn analyzer(mut self, analyzer: AnalyzerChain) -> Self {
        self.analyzer = Arc::new(analyzer);
        self
    }

    pub fn rim_designer(mut self, designer: Option<Box<dyn RimDesigner>>) -> Self {
        self.rim_designer = designer.map(Arc::from);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    pub fn business_number(mut self, number: impl Into<String>) -> Self {
        self.business_number = number.into();
        self
    }

    /// Load the persisted session and pick the first screen.
    pub async fn build(self) -> Result<ViewRouter> {
        let phone = self.store.phone().await?;
        let profile = self.store.profile().await?;
        let history = self.store.history().await?;

        let view = match (&phone, &profile) {
            (None, _) => View::Registration,
            (Some(_), None) => View::UserProfile,
            (Some(_), Some(_)) => View::Dashboard,
        };
        info!(
            "Session loaded: view={}, {} history records",
            view,
            history.len()
        );

        Ok(ViewRouter {
            store: self.store,
            database: self.database,
            opener: self.opener,
            resolver: self.resolver,
            analyzer: self.analyzer,
            rim_designer: self.rim_designer,
            clock: self.clock,
            config: self.config,
            business_number: self.business_number,
            view,
            last_result: None,
            phone,
            profile,
            history,
            emergency_id: None,
            scheduled: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dispatch::RecordingOpener;
    use rescue_core::{ReviewRequest, TirePosition};
    use session_store::MemorySessionStore;

    fn profile() -> UserProfile {
        UserProfile {
            phone_number: "91234567".to_string(),
            name: "陳大文".to_string(),
            car_brand: "Toyota".to_string(),
            license_plate: None,
            is_verified: true,
        }
    }

    async fn registered(opener: RecordingOpener) -> ViewRouter {
        let store = Arc::new(MemorySessionStore::new());
        store.set_phone("91234567").await.unwrap();
        store.set_profile(&profile()).await.unwrap();
        ViewRouter::builder(store)
            .opener(Arc::new(opener))
            .build()
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_initial_view_follows_stored_session() {
        let store = Arc::new(MemorySessionStore::new());
        let router = ViewRouter::builder(store.clone()).build().await.unwrap();
        assert_eq!(router.view(), View::Registration);

        store.set_phone("91234567").await.unwrap();
        let router = ViewRouter::builder(store.clone()).build().await.unwrap();
        assert_eq!(router.view(), View::UserProfile);

        store.set_profile(&profile()).await.unwrap();
        let router = ViewRouter::builder(store).build().await.unwrap();
        assert_eq!(router.view(), View::Dashboard);
    }

    #[tokio::test]
    async fn test_select_service() {
        let mut router = registered(RecordingOpener::new()).await;

        let ack = router.select_service("inspection").unwrap();
        assert_eq!(ack.as_deref(), Some("已收到您的「inspection」查詢，客服將會聯絡您。"));
        assert_eq!(router.view(), View::Dashboard);

        let ack = router.select_service("rim-design").unwrap();
        assert_eq!(ack.as_deref(), Some(RIM_DESIGN_COMING_SOON));
        assert!(!router.dashboard().contains(&ServiceId::RimDesign));

        assert!(router.select_service("repair").unwrap().is_none());
        assert_eq!(router.view(), View::RepairLocation);
        router.back().unwrap();

        router.select_service("history").unwrap();
        assert_eq!(router.view(), View::RepairHistory);
    }

    #[tokio::test]
    async fn test_wrong_screen_is_rejected() {
        let mut router = registered(RecordingOpener::new()).await;

        let err = router.send_location().await.unwrap_err();
        assert!(matches!(
            err,
            AppError::InvalidTransition {
                view: View::Dashboard,
                ..
            }
        ));
        assert!(router.cancel().is_err());
        assert!(router.back().is_err());
    }

    #[tokio::test]
    async fn test_edit_emergency_returns_to_form() {
        let mut router = registered(RecordingOpener::new()).await;
        router.select_service("emergency-flat").unwrap();
        router
            .submit_emergency(EmergencyRequest {
                name: "陳大文".to_string(),
                car_brand: "Toyota".to_string(),
                tire_position: TirePosition::FrontLeft,
                photo: None,
                ai_analysis: None,
            })
            .await
            .unwrap();

        router.edit_emergency().unwrap();
        assert_eq!(router.view(), View::EmergencyForm);
        assert!(router.history().is_empty());

        router.cancel().unwrap();
        assert_eq!(router.view(), View::Dashboard);
    }

    #[tokio::test(start_paused = true)]
    async fn test_review_link_opens_after_delay() {
        let opener = RecordingOpener::new();
        let mut router = registered(opener.clone()).await;
        router.select_service("review").unwrap();

        router
            .submit_review(ReviewRequest {
                rating: 5,
                comment: "好快".to_string(),
                photo: None,
                timestamp: None,
            })
            .await
            .unwrap();

        assert_eq!(router.view(), View::Success);
        assert!(matches!(router.last_result(), Some(LastResult::Review(_))));
        assert!(opener.opened().is_empty());
        assert!(router.history().is_empty());

        router.flush_links().await;
        let opened = opener.opened();
        assert_eq!(opened.len(), 1);
        assert!(opened[0].starts_with("https://wa.me/85296151351?text="));
    }
}
