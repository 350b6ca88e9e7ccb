//! Cinema Sócrates desktop window (egui/eframe).
//!
//! # Layout
//!
//! | Tab          | Panel                | Backing state       |
//! |--------------|----------------------|---------------------|
//! | CINE         | poster / meme maker  | [`PosterPipeline`]  |
//! | MUSIC HALL   | music critique       | [`MusicPanel`]      |
//! | ROBOT        | persona chat         | [`ChatPanel`]       |
//!
//! The error banner above the tabs is shared by all three panels.
//!
//! Provider work never runs on the UI thread: each click calls the panel's
//! synchronous `begin` (guard + status flip) and spawns the async `execute`
//! on the tokio runtime, which requests a repaint when it lands.

use std::path::PathBuf;
use std::time::Duration;

use eframe::egui;
use tokio::runtime::Handle;

use crate::audio::VoiceRecorder;
use crate::config::AppConfig;
use crate::export::{save_image, share_result, ClipboardShare};
use crate::genai::{ArtifactStyle, Genre};
use crate::media::{load_input, MediaPayload};
use crate::messages;
use crate::pipeline::{
    ChatPanel, ChatRole, ErrorBanner, GenerationResult, MusicPanel, PosterPipeline, RunToken,
};

const ACCENT: egui::Color32 = egui::Color32::from_rgb(234, 179, 8);
const DIM: egui::Color32 = egui::Color32::from_rgb(150, 150, 150);
const ERROR_BG: egui::Color32 = egui::Color32::from_rgb(127, 29, 29);

/// File extensions offered by the picker.
const PICKABLE: &[&str] = &[
    "txt", "pdf", "doc", "docx", "mp3", "wav", "m4a", "ogg", "webm", "mp4", "mov", "png", "jpg",
    "jpeg", "webp",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Cine,
    MusicHall,
    Robot,
}

impl Tab {
    fn label(self) -> &'static str {
        match self {
            Tab::Cine => "CINE",
            Tab::MusicHall => "MUSIC HALL",
            Tab::Robot => "ROBOT",
        }
    }
}

/// Which text box a running voice recording feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dictation {
    Poster,
    Chat,
}

/// Poster texture, kept so the image is not re-decoded every frame.
struct PosterPreview {
    run: RunToken,
    texture: egui::TextureHandle,
}

pub struct CinemaApp {
    tab: Tab,
    poster: PosterPipeline,
    music: MusicPanel,
    chat: ChatPanel,
    banner: ErrorBanner,
    runtime: Handle,
    config: AppConfig,

    recorder: VoiceRecorder,
    dictation: Option<Dictation>,
    preview: Option<PosterPreview>,
    /// One-line confirmation under the poster (e.g. where it was saved).
    notice: Option<String>,
}

impl CinemaApp {
    pub fn new(
        poster: PosterPipeline,
        music: MusicPanel,
        chat: ChatPanel,
        banner: ErrorBanner,
        runtime: Handle,
        config: AppConfig,
    ) -> Self {
        Self {
            tab: Tab::Cine,
            poster,
            music,
            chat,
            banner,
            runtime,
            config,
            recorder: VoiceRecorder::new(),
            dictation: None,
            preview: None,
            notice: None,
        }
    }

    // ── Shared helpers ───────────────────────────────────────────────────

    fn pick_file(&self) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .add_filter("Texto, documentos, audio, video o imagen", PICKABLE)
            .pick_file()
    }

    /// Load a picked file, raising the banner on failure.
    fn load_picked(&self, path: &std::path::Path) -> Option<crate::media::LoadedInput> {
        match load_input(path, self.config.input.max_video_bytes()) {
            Ok(input) => Some(input),
            Err(e) => {
                log::warn!("input: {}: {e}", path.display());
                self.banner.raise(e.user_message());
                None
            }
        }
    }

    fn toggle_recording(&mut self, ctx: &egui::Context, target: Dictation) {
        if self.recorder.is_recording() {
            let audio = match self.recorder.stop() {
                Ok(audio) => audio,
                Err(e) => {
                    log::error!("recorder: {e}");
                    self.banner.raise(messages::TRANSCRIPTION_FAILED);
                    None
                }
            };
            let target = self.dictation.take().unwrap_or(target);
            if let Some(audio) = audio {
                self.dispatch_dictation(ctx, target, audio);
            }
            return;
        }

        match self.recorder.start() {
            Ok(()) => self.dictation = Some(target),
            Err(e) => {
                log::error!("recorder: {e}");
                self.banner.raise(messages::MICROPHONE_UNAVAILABLE);
            }
        }
    }

    fn dispatch_dictation(&self, ctx: &egui::Context, target: Dictation, audio: MediaPayload) {
        let ctx = ctx.clone();
        match target {
            Dictation::Poster => {
                let Some(token) = self.poster.begin_transcription() else {
                    return;
                };
                let poster = self.poster.clone();
                self.runtime.spawn(async move {
                    poster.execute_transcription(token, audio).await;
                    ctx.request_repaint();
                });
            }
            Dictation::Chat => {
                let chat = self.chat.clone();
                self.runtime.spawn(async move {
                    chat.dictate(audio).await;
                    ctx.request_repaint();
                });
            }
        }
    }

    fn mic_button(&mut self, ui: &mut egui::Ui, target: Dictation, enabled: bool) {
        let recording_here = self.dictation == Some(target) && self.recorder.is_recording();
        let label = if recording_here { "⏹ Detener" } else { "🎤 Dictar" };
        let other_busy = self.recorder.is_recording() && !recording_here;
        if ui
            .add_enabled(enabled && !other_busy, egui::Button::new(label))
            .clicked()
        {
            let ctx = ui.ctx().clone();
            self.toggle_recording(&ctx, target);
        }
    }

    fn draw_banner(&self, ui: &mut egui::Ui) {
        let Some(message) = self.banner.current() else {
            return;
        };
        egui::Frame::new()
            .fill(ERROR_BG)
            .inner_margin(egui::Margin::same(8))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(message).color(egui::Color32::WHITE));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button("x").clicked() {
                            self.banner.clear();
                        }
                    });
                });
            });
    }

    // ── CINE ──────────────────────────────────────────────────────────────

    fn draw_cine(&mut self, ui: &mut egui::Ui) {
        let (status, mut text, style, mut genre, media_name, error) = self.poster.view(|st| {
            (
                st.status,
                st.input_text.clone(),
                st.style,
                st.genre,
                st.media.as_ref().map(|m| m.name.clone()),
                st.error_message.clone(),
            )
        });
        let busy = status.is_busy();

        ui.heading("¿Qué película filosófica querés ver hoy?");
        ui.add_space(6.0);

        let edit = ui.add_enabled(
            !busy,
            egui::TextEdit::multiline(&mut text)
                .hint_text("Escribí una idea, una duda existencial o pegá un texto...")
                .desired_rows(4)
                .desired_width(f32::INFINITY),
        );
        if edit.changed() {
            self.poster.set_input_text(text.clone());
        }

        ui.horizontal(|ui| {
            if ui.add_enabled(!busy, egui::Button::new("📎 Subir archivo")).clicked() {
                if let Some(path) = self.pick_file() {
                    if let Some(input) = self.load_picked(&path) {
                        self.poster.apply_input(input);
                    }
                }
            }
            self.mic_button(ui, Dictation::Poster, !busy);
            if let Some(name) = &media_name {
                ui.label(egui::RichText::new(format!("Adjunto: {name}")).color(DIM));
                if ui.small_button("quitar").clicked() {
                    self.poster.clear_media();
                }
            }
        });

        ui.add_space(6.0);
        ui.horizontal(|ui| {
            for option in [ArtifactStyle::Poster, ArtifactStyle::Meme] {
                if ui
                    .add_enabled(!busy, egui::SelectableLabel::new(style == option, option.label()))
                    .clicked()
                {
                    self.poster.set_style(option);
                }
            }

            if style == ArtifactStyle::Poster {
                ui.add_enabled_ui(!busy, |ui| {
                    egui::ComboBox::from_label("Género")
                        .selected_text(genre.label())
                        .show_ui(ui, |ui| {
                            for option in Genre::ALL {
                                ui.selectable_value(&mut genre, option, option.label());
                            }
                        });
                });
                self.poster.set_genre(genre);
            }
        });

        ui.add_space(8.0);
        let can_submit = !busy && (!text.trim().is_empty() || media_name.is_some());
        ui.horizontal(|ui| {
            let label = match style {
                ArtifactStyle::Poster => "🎬 GENERAR PÓSTER",
                ArtifactStyle::Meme => "😂 GENERAR MEME",
            };
            if ui
                .add_enabled(can_submit, egui::Button::new(egui::RichText::new(label).strong()))
                .clicked()
            {
                self.start_poster_run(ui.ctx());
            }
            if busy {
                ui.spinner();
            }
            ui.label(egui::RichText::new(status.label()).color(DIM));
        });

        if let Some(error) = error {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.colored_label(egui::Color32::LIGHT_RED, error);
                if ui.small_button("Cerrar").clicked() {
                    self.poster.reset();
                }
            });
        }

        if let Some(result) = self.poster.result() {
            ui.separator();
            self.draw_result(ui, &result);
        } else {
            self.preview = None;
        }
    }

    fn start_poster_run(&self, ctx: &egui::Context) {
        let Some((token, request)) = self.poster.begin() else {
            return;
        };
        let poster = self.poster.clone();
        let ctx = ctx.clone();
        self.runtime.spawn(async move {
            poster.execute(token, request).await;
            ctx.request_repaint();
        });
    }

    /// Texture for `result`, decoded once per run.
    fn preview_texture(
        &mut self,
        ctx: &egui::Context,
        result: &GenerationResult,
    ) -> Option<egui::TextureHandle> {
        if let Some(preview) = &self.preview {
            if preview.run == result.run {
                return Some(preview.texture.clone());
            }
        }
        let decoded = result
            .image
            .decode()
            .map_err(|e| e.to_string())
            .and_then(|bytes| image::load_from_memory(&bytes).map_err(|e| e.to_string()));
        match decoded {
            Ok(img) => {
                let rgba = img.to_rgba8();
                let size = [rgba.width() as usize, rgba.height() as usize];
                let color = egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
                let texture = ctx.load_texture(
                    format!("poster-{}", result.run.id()),
                    color,
                    egui::TextureOptions::LINEAR,
                );
                self.preview = Some(PosterPreview {
                    run: result.run,
                    texture: texture.clone(),
                });
                Some(texture)
            }
            Err(e) => {
                log::error!("preview: cannot decode image: {e}");
                None
            }
        }
    }

    fn draw_result(&mut self, ui: &mut egui::Ui, result: &GenerationResult) {
        if let Some(texture) = self.preview_texture(ui.ctx(), result) {
            ui.add(
                egui::Image::new(egui::load::SizedTexture::from_handle(&texture))
                    .max_width(420.0)
                    .shrink_to_fit(),
            );
        }

        if let Some(meta) = &result.movie_metadata {
            ui.label(egui::RichText::new(&meta.title).heading().color(ACCENT));
            ui.label(egui::RichText::new(format!("Protagonizada por {}", meta.actors)).italics());
        }
        ui.label(egui::RichText::new(format!("Idea original: {}", result.original_input)).color(DIM));

        ui.horizontal(|ui| {
            if ui.button("⬇ Descargar").clicked() {
                let dir = self.config.export.resolved_download_dir();
                self.notice = match save_image(&result.image, &dir) {
                    Ok(path) => Some(format!("Guardado en {}", path.display())),
                    Err(e) => {
                        log::error!("download: {e:#}");
                        self.banner.raise(messages::DOWNLOAD_FAILED);
                        None
                    }
                };
            }
            if ui.button("↗ Compartir").clicked() {
                let mut target = ClipboardShare;
                match share_result(&mut target, result, &self.config.export.share_url) {
                    Some(alert) => self.banner.raise(alert),
                    None => self.notice = Some("Copiado al portapapeles.".into()),
                }
            }
            if ui.button("Nueva idea").clicked() {
                self.poster.reset();
                self.notice = None;
            }
        });

        if let Some(notice) = &self.notice {
            ui.label(egui::RichText::new(notice).color(DIM).small());
        }
    }

    // ── MUSIC HALL ────────────────────────────────────────────────────────

    fn draw_music(&mut self, ui: &mut egui::Ui) {
        let (status, mut text, media_name, analysis) = self.music.view(|st| {
            (
                st.status,
                st.input_text.clone(),
                st.media.as_ref().map(|m| m.name.clone()),
                st.analysis.clone(),
            )
        });
        let busy = status.is_busy();

        ui.heading("Music Hall filosófico");
        ui.label(egui::RichText::new("Pegá un link, el nombre de un tema o una letra.").color(DIM));
        ui.add_space(6.0);

        if ui
            .add_enabled(
                !busy,
                egui::TextEdit::multiline(&mut text)
                    .hint_text("Ej: Bohemian Rhapsody - Queen")
                    .desired_rows(3)
                    .desired_width(f32::INFINITY),
            )
            .changed()
        {
            self.music.set_input_text(text);
        }

        ui.horizontal(|ui| {
            if ui.add_enabled(!busy, egui::Button::new("📎 Subir audio o letra")).clicked() {
                if let Some(path) = self.pick_file() {
                    if let Some(input) = self.load_picked(&path) {
                        self.music.apply_input(input);
                    }
                }
            }
            if let Some(name) = &media_name {
                ui.label(egui::RichText::new(format!("Adjunto: {name}")).color(DIM));
                if ui.small_button("quitar").clicked() {
                    self.music.clear_media();
                }
            }
        });

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui.add_enabled(!busy, egui::Button::new("🎸 ANALIZAR")).clicked() {
                if let Some((token, text, media)) = self.music.begin() {
                    let music = self.music.clone();
                    let ctx = ui.ctx().clone();
                    self.runtime.spawn(async move {
                        music.execute(token, text, media).await;
                        ctx.request_repaint();
                    });
                }
            }
            if busy {
                ui.spinner();
                ui.label(egui::RichText::new("Escuchando con oído filosófico...").color(DIM));
            }
        });

        if let Some(analysis) = analysis {
            ui.separator();
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.label(analysis);
            });
        }
    }

    // ── ROBOT ─────────────────────────────────────────────────────────────

    fn draw_chat(&mut self, ui: &mut egui::Ui) {
        let (status, messages, mut draft) = self
            .chat
            .view(|st| (st.status, st.messages.clone(), st.draft.clone()));
        let busy = status.is_busy();

        ui.horizontal(|ui| {
            ui.heading("El Profe");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.small_button("Nueva charla").clicked() {
                    self.chat.restart();
                }
            });
        });

        let input_height = 72.0;
        egui::ScrollArea::vertical()
            .max_height((ui.available_height() - input_height).max(120.0))
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for message in &messages {
                    let (who, color) = match message.role {
                        ChatRole::User => ("Vos", egui::Color32::LIGHT_BLUE),
                        ChatRole::Assistant => ("El Profe", ACCENT),
                    };
                    ui.label(egui::RichText::new(who).strong().color(color));
                    ui.label(&message.text);
                    ui.add_space(6.0);
                }
                if busy {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label(egui::RichText::new("El Profe está pensando...").color(DIM));
                    });
                }
            });

        ui.separator();
        ui.horizontal(|ui| {
            let edit = ui.add(
                egui::TextEdit::singleline(&mut draft)
                    .hint_text("Preguntale algo al Profe...")
                    .desired_width(ui.available_width() - 180.0),
            );
            if edit.changed() {
                self.chat.set_draft(draft.clone());
            }
            let enter = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

            self.mic_button(ui, Dictation::Chat, !busy);
            let send = ui
                .add_enabled(!busy && !draft.trim().is_empty(), egui::Button::new("Enviar"))
                .clicked();

            if send || enter {
                if let Some((token, text, session)) = self.chat.begin(&draft) {
                    let chat = self.chat.clone();
                    let ctx = ui.ctx().clone();
                    self.runtime.spawn(async move {
                        chat.execute(token, text, session).await;
                        ctx.request_repaint();
                    });
                }
            }
        });
    }

    fn any_busy(&self) -> bool {
        self.poster.status().is_busy()
            || self.music.status().is_busy()
            || self.chat.status().is_busy()
            || self.recorder.is_recording()
    }
}

// ---------------------------------------------------------------------------
// eframe::App impl
// ---------------------------------------------------------------------------

impl eframe::App for CinemaApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Spinners animate only while something is in flight.
        if self.any_busy() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("CINEMA SÓCRATES").heading().strong().color(ACCENT));
                ui.add_space(16.0);
                for tab in [Tab::Cine, Tab::MusicHall, Tab::Robot] {
                    ui.selectable_value(&mut self.tab, tab, tab.label());
                }
            });
            ui.add_space(4.0);
            self.draw_banner(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| match self.tab {
            Tab::Cine => {
                egui::ScrollArea::vertical().show(ui, |ui| self.draw_cine(ui));
            }
            Tab::MusicHall => self.draw_music(ui),
            Tab::Robot => self.draw_chat(ui),
        });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Err(e) = self.recorder.stop() {
            log::warn!("recorder: {e}");
        }
        log::info!("Cinema Sócrates closing");
    }
}
