//! Line-oriented terminal front-end.
//!
//! Renders the router's current screen as text and feeds typed answers back
//! as router actions. At any prompt `<` leaves the current form.

use rand::Rng;
use rescue_core::tires::widths;
use rescue_core::validation::parse_rating;
use rescue_core::{BookingKind, ServiceId, TirePosition, View};
use tire_vision::{load_photo, RIM_STYLES};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};
use tracing::warn;

use crate::error::Result;
use crate::forms::{BookingForm, EmergencyForm, ProfileForm, ReviewForm};
use crate::history::{newest_first, EMPTY_HISTORY};
use crate::router::ViewRouter;
use crate::screens::{history_line, SuccessSummary, LOCATION_STEP_BODY, LOCATION_STEP_TITLE};
use crate::verify::{CodeEntry, Verifier};

const CANCEL: &str = "<";

/// Terminal session over a router.
pub struct Console<R, W> {
    router: ViewRouter,
    verifier: Verifier,
    input: Lines<R>,
    output: W,
    closed: bool,
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(router: ViewRouter, verifier: Verifier, input: R, output: W) -> Self {
        Self {
            router,
            verifier,
            input: input.lines(),
            output,
            closed: false,
        }
    }

    pub fn router(&self) -> &ViewRouter {
        &self.router
    }

    pub fn into_router(self) -> ViewRouter {
        self.router
    }

    /// Drive screens until input ends or the user quits.
    pub async fn run(&mut self) -> Result<()> {
        while !self.closed {
            self.step().await?;
        }
        self.router.flush_links().await;
        Ok(())
    }

    async fn say(&mut self, text: &str) -> Result<()> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.write_all(b"\n").await?;
        self.output.flush().await?;
        Ok(())
    }

    /// Ask for one line. `None` means the form was left or input ended.
    async fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        self.output.write_all(format!("{}> ", prompt).as_bytes()).await?;
        self.output.flush().await?;

        match self.input.next_line().await? {
            Some(line) if line.trim() == CANCEL => Ok(None),
            Some(line) => Ok(Some(line.trim().to_string())),
            None => {
                self.closed = true;
                Ok(None)
            }
        }
    }

    async fn ask_default(&mut self, prompt: &str, default: &str) -> Result<Option<String>> {
        let prompt = if default.is_empty() {
            prompt.to_string()
        } else {
            format!("{} [{}]", prompt, default)
        };
        Ok(self.ask(&prompt).await?.map(|answer| {
            if answer.is_empty() {
                default.to_string()
            } else {
                answer
            }
        }))
    }

    /// Leave the current form, unless input has ended.
    fn leave_form(&mut self) -> Result<()> {
        if !self.closed {
            self.router.cancel()?;
        }
        Ok(())
    }

    async fn load_photo(&mut self, path: &str) -> Result<Option<String>> {
        if path.is_empty() {
            return Ok(None);
        }
        match load_photo(path).await {
            Ok(photo) => Ok(Some(photo)),
            Err(e) => {
                warn!("Photo {} rejected: {}", path, e);
                self.say(&format!("⚠️ {}", e)).await?;
                Ok(None)
            }
        }
    }

    async fn step(&mut self) -> Result<()> {
        match self.router.view() {
            View::Registration => self.registration().await,
            View::UserProfile => self.user_profile().await,
            View::Dashboard => self.dashboard().await,
            View::EmergencyForm => self.emergency_form().await,
            View::EmergencyLocationStep => self.location_step().await,
            View::ServiceForm => self.booking_form(BookingKind::TireChange).await,
            View::MaintenanceForm => self.booking_form(BookingKind::Maintenance).await,
            View::ReviewForm => self.review_form().await,
            View::RepairHistory => self.repair_history().await,
            View::RepairLocation => self.repair_location().await,
            View::RimDesign => self.rim_design().await,
            View::Success => self.success().await,
        }
    }

    async fn registration(&mut self) -> Result<()> {
        self.say("\n== 會員登記 / 登入 ==").await?;
        let Some(phone) = self.ask("電話號碼").await? else {
            return Ok(());
        };

        self.say("發送中...").await?;
        let phone = match self.verifier.send_code(&phone).await {
            Ok(phone) => phone,
            Err(e) => return self.say(&e.to_string()).await,
        };
        self.say(&format!("已發送驗證碼至 {}", phone)).await?;

        loop {
            let Some(code) = self.ask("驗證碼 (4位)").await? else {
                return Ok(());
            };
            let mut entry = CodeEntry::new();
            entry.type_str(&code);
            match self.verifier.verify(&entry) {
                Ok(()) => return self.router.verified(&phone).await,
                Err(e) => self.say(&e.to_string()).await?,
            }
        }
    }

    async fn user_profile(&mut self) -> Result<()> {
        let phone = self.router.phone().unwrap_or_default().to_string();
        self.say(&format!("\n== 完善個人資料 ==\n電話: {}", phone))
            .await?;

        let Some(name) = self.ask("聯絡人稱呼").await? else {
            return Ok(());
        };
        let Some(car_brand) = self.ask("車輛品牌及型號").await? else {
            return Ok(());
        };
        let Some(license_plate) = self.ask("車牌號碼 (可選)").await? else {
            return Ok(());
        };

        let form = ProfileForm {
            name,
            car_brand,
            license_plate,
        };
        match form.submit(&phone) {
            Ok(profile) => self.router.save_profile(profile).await,
            Err(e) => self.say(&e.to_string()).await,
        }
    }

    async fn dashboard(&mut self) -> Result<()> {
        let name = self
            .router
            .profile()
            .map(|p| p.display_name().to_string())
            .unwrap_or_else(|| "Guest".to_string());
        let entries = self.router.dashboard();

        let mut menu = format!("\n== EB Rescue ==\n{} 你好", name);
        for (i, id) in entries.iter().enumerate() {
            menu.push_str(&format!("\n  {}. {}", i + 1, id.title()));
        }
        menu.push_str(&format!("\n  h. {}", ServiceId::History.title()));
        menu.push_str("\n  x. 登出\n  q. 離開");
        self.say(&menu).await?;

        let Some(choice) = self.ask("選擇服務").await? else {
            return Ok(());
        };
        let id = match choice.as_str() {
            "q" => {
                self.closed = true;
                return Ok(());
            }
            "x" => return self.router.logout().await,
            "h" => ServiceId::History.as_str().to_string(),
            other => match other.parse::<usize>() {
                Ok(n) if (1..=entries.len()).contains(&n) => entries[n - 1].as_str().to_string(),
                _ => other.to_string(),
            },
        };

        if let Some(ack) = self.router.select_service(&id)? {
            self.say(&ack).await?;
        }
        Ok(())
    }

    async fn emergency_form(&mut self) -> Result<()> {
        self.say("\n== 爆呔緊急維修表格 ==").await?;
        let mut form = EmergencyForm::prefilled(self.router.profile());

        let Some(path) = self.ask("輪胎狀況照片路徑 (可選)").await? else {
            return self.leave_form();
        };
        if let Some(photo) = self.load_photo(&path).await? {
            self.say("AI 分析中...").await?;
            let analysis = form
                .attach_photo(photo, self.router.analyzer())
                .await
                .to_string();
            self.say(&format!("AI 分析: {}", analysis)).await?;
        }

        let default_name = form.name.clone();
        let Some(name) = self.ask_default("聯絡人", &default_name).await? else {
            return self.leave_form();
        };
        let default_brand = form.car_brand.clone();
        let Some(car_brand) = self.ask_default("車輛品牌", &default_brand).await? else {
            return self.leave_form();
        };

        let mut positions = String::from("爆呔位置:");
        for (i, position) in TirePosition::ALL.iter().enumerate() {
            positions.push_str(&format!(" {}. {}", i + 1, position.short_label()));
        }
        self.say(&positions).await?;
        let Some(choice) = self.ask("位置").await? else {
            return self.leave_form();
        };

        form.name = name;
        form.car_brand = car_brand;
        form.tire_position = choice
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| TirePosition::ALL.get(i).copied());

        match form.submit() {
            Ok(request) => self.router.submit_emergency(request).await,
            Err(e) => self.say(&e.to_string()).await,
        }
    }

    async fn location_step(&mut self) -> Result<()> {
        self.say(&format!(
            "\n== {} ==\n{}\n  1. 開啟 WhatsApp 發送位置\n  2. 返回修改資料",
            LOCATION_STEP_TITLE, LOCATION_STEP_BODY
        ))
        .await?;

        match self.ask("選擇").await?.as_deref() {
            Some("1") => {
                let link = self.router.send_location().await?;
                self.say(&format!("WhatsApp: {}", link)).await
            }
            Some("2") => self.router.edit_emergency(),
            _ => Ok(()),
        }
    }

    async fn booking_form(&mut self, kind: BookingKind) -> Result<()> {
        self.say(&format!("\n== 預約 {} ==", kind.title())).await?;
        let mut form = BookingForm::prefilled(kind, self.router.profile());

        let Some(address) = self.ask("服務地點 (輸入 @ 使用目前位置)").await? else {
            return self.leave_form();
        };
        if address == "@" {
            match form.autofill_address(self.router.resolver()).await {
                Ok(notice) => {
                    self.say(&format!("地點: {}", form.address)).await?;
                    if let Some(notice) = notice {
                        self.say(notice).await?;
                    }
                }
                Err(e) => self.say(&e.to_string()).await?,
            }
        } else {
            form.address = address;
        }

        let Some(date) = self.ask("日期 (YYYY-MM-DD)").await? else {
            return self.leave_form();
        };
        let Some(time) = self.ask("時間 (HH:MM)").await? else {
            return self.leave_form();
        };
        let default_brand = form.car_brand.clone();
        let Some(car_brand) = self.ask_default("車輛品牌", &default_brand).await? else {
            return self.leave_form();
        };
        form.date = date;
        form.time = time;
        form.car_brand = car_brand;

        if kind == BookingKind::TireChange && !self.ask_tire_size(&mut form).await? {
            return self.leave_form();
        }

        let prompt = match kind {
            BookingKind::TireChange => "備註 (可選)",
            BookingKind::Maintenance => "保養項目 / 詳情",
        };
        let Some(comment) = self.ask(prompt).await? else {
            return self.leave_form();
        };
        form.comment = comment;

        if kind == BookingKind::TireChange {
            let Some(path) = self.ask("輪胎照片路徑 (可選)").await? else {
                return self.leave_form();
            };
            form.photo = self.load_photo(&path).await?;
        }

        match form.submit(&self.profile_for_booking(), self.router.clock()) {
            Ok(request) => self.router.submit_booking(request).await,
            Err(e) => self.say(&e.to_string()).await,
        }
    }

    fn profile_for_booking(&self) -> rescue_core::UserProfile {
        self.router.profile().cloned().unwrap_or_else(|| rescue_core::UserProfile {
            phone_number: self.router.phone().unwrap_or_default().to_string(),
            name: String::new(),
            car_brand: String::new(),
            license_plate: None,
            is_verified: true,
        })
    }

    /// Returns false when the form was left.
    async fn ask_tire_size(&mut self, form: &mut BookingForm) -> Result<bool> {
        let options = widths().collect::<Vec<_>>().join(" ");
        self.say(&format!("闊度: {}", options)).await?;
        let Some(width) = self.ask("輪胎闊度").await? else {
            return Ok(false);
        };
        if let Err(e) = form.tires.select_width(&width) {
            self.say(&e.to_string()).await?;
            return Ok(true);
        }

        let ratios = form.tires.aspect_ratios().join(" ");
        self.say(&format!("扁平比: {}", ratios)).await?;
        let Some(ratio) = self.ask("扁平比").await? else {
            return Ok(false);
        };
        if let Err(e) = form.tires.select_aspect_ratio(&ratio) {
            self.say(&e.to_string()).await?;
            return Ok(true);
        }

        let diameters = form.tires.diameters().join(" ");
        self.say(&format!("呔圈直徑: {}", diameters)).await?;
        let Some(diameter) = self.ask("呔圈直徑").await? else {
            return Ok(false);
        };
        if let Err(e) = form.tires.select_diameter(&diameter) {
            self.say(&e.to_string()).await?;
        }
        Ok(true)
    }

    async fn review_form(&mut self) -> Result<()> {
        let name = self
            .router
            .profile()
            .map(|p| p.display_name().to_string())
            .unwrap_or_else(|| "Customer".to_string());
        self.say(&format!(
            "\n== 評價服務 (Review) ==\nHi {}, 請為我們的服務評分。",
            name
        ))
        .await?;

        let mut form = ReviewForm::default();
        let Some(rating) = self.ask_default("評分 (1-5)", "5").await? else {
            return self.leave_form();
        };
        form.rating = match parse_rating(&rating) {
            Ok(rating) => rating,
            Err(e) => return self.say(&e.to_string()).await,
        };

        let Some(comment) = self.ask("意見 (可選)").await? else {
            return self.leave_form();
        };
        form.comment = comment;

        let Some(path) = self.ask("照片路徑 (可選)").await? else {
            return self.leave_form();
        };
        form.photo = self.load_photo(&path).await?;

        match form.submit(self.router.clock()) {
            Ok(review) => self.router.submit_review(review).await,
            Err(e) => self.say(&e.to_string()).await,
        }
    }

    async fn repair_history(&mut self) -> Result<()> {
        let mut text = String::from("\n== 維修記錄 ==");
        let lines: Vec<String> = newest_first(self.router.history())
            .into_iter()
            .map(history_line)
            .collect();
        if lines.is_empty() {
            text.push_str(&format!("\n{}", EMPTY_HISTORY));
        }
        for line in lines {
            text.push_str(&format!("\n{}", line));
        }
        self.say(&text).await?;
        self.back_on_enter().await
    }

    async fn repair_location(&mut self) -> Result<()> {
        let shop = dispatch::SHOP;
        self.say(&format!(
            "\n== {} ==\n{}\n{}\n{}\n導航: {}",
            shop.title,
            shop.address_zh,
            shop.address_en,
            shop.hours,
            shop.navigation_link()
        ))
        .await?;
        self.back_on_enter().await
    }

    async fn rim_design(&mut self) -> Result<()> {
        self.say("\n== AI 輪圈改色 ==").await?;
        let Some(path) = self.ask("車輛照片路徑").await? else {
            return self.back_unless_closed();
        };
        let Some(photo) = self.load_photo(&path).await? else {
            return Ok(());
        };

        let mut styles = String::from("款式:");
        for (i, style) in RIM_STYLES.iter().enumerate() {
            styles.push_str(&format!(" {}. {}", i + 1, style));
        }
        self.say(&styles).await?;
        let Some(choice) = self.ask("款式").await? else {
            return self.back_unless_closed();
        };
        let style = choice
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| RIM_STYLES.get(i).copied())
            .unwrap_or(RIM_STYLES[0]);

        self.say("生成中...").await?;
        match self.router.design_rims(&photo, style).await {
            Ok(Some(image)) => self.say(&format!("效果圖: {}", image)).await?,
            Ok(None) => self.say("未能生成效果圖，請稍後再試。").await?,
            Err(e) => {
                warn!("Rim design failed: {}", e);
                self.say("未能生成效果圖，請稍後再試。").await?
            }
        }
        self.back_on_enter().await
    }

    async fn success(&mut self) -> Result<()> {
        let Some(result) = self.router.last_result().cloned() else {
            return self.router.back();
        };
        let reference = rand::thread_rng().gen_range(0..10000);
        let summary = SuccessSummary::new(&result, self.router.phone(), reference);

        let mut text = format!("\n== {} ==\n{}", summary.title, summary.message);
        for (label, value) in &summary.fields {
            text.push_str(&format!("\n  {}: {}", label, value));
        }
        self.say(&text).await?;
        self.back_on_enter().await
    }

    async fn back_on_enter(&mut self) -> Result<()> {
        self.ask("按 Enter 返回主頁").await?;
        self.back_unless_closed()
    }

    fn back_unless_closed(&mut self) -> Result<()> {
        if !self.closed {
            self.router.back()?;
        }
        Ok(())
    }
}
