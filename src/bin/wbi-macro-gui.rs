/*!
 * Desktop dashboard for wbi-macro - World Bank macro indicators for one country
 *
 * - Pick a country (aggregates are not offered)
 * - Fetch the indicator catalog in chunks, with per-chunk retry
 * - Browse the year x indicator table, chart selected series
 * - Download the table as an Excel workbook
 *
 * Platform support: Windows, macOS, Linux
 */

use eframe::egui;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc;
use std::thread;
use wbi_macro::api::{DEFAULT_BASE_URL, WDI_SOURCE};
use wbi_macro::dashboard::DEFAULT_COUNTRY;
use wbi_macro::fetcher::FetchProgress;
use wbi_macro::table::format_cell;
use wbi_macro::{Client, Country, Dashboard, DashboardConfig, DashboardError, FetchReport};
use wbi_macro::{storage, viz};

const CHART_SIZE: [usize; 2] = [960, 480];

fn main() -> Result<(), eframe::Error> {
    env_logger::init();

    let dashboard = match build_dashboard() {
        Ok(d) => Arc::new(d),
        Err(err) => {
            log::error!("cannot start dashboard: {err:#}");
            std::process::exit(1);
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 800.0])
            .with_min_inner_size([700.0, 500.0])
            .with_title("World Bank Macro Dashboard"),
        ..Default::default()
    };

    eframe::run_native(
        "World Bank Macro Dashboard",
        options,
        Box::new(move |cc| Ok(Box::new(MacroApp::new(dashboard, cc.egui_ctx.clone())))),
    )
}

fn build_dashboard() -> anyhow::Result<Dashboard<Client>> {
    let client = Client::new(DEFAULT_BASE_URL, WDI_SOURCE)?;
    Ok(Dashboard::new(client, DashboardConfig::default())?)
}

/// Messages from worker threads.
enum Message {
    /// Selectable countries and the index to preselect.
    Countries(Result<(Vec<Country>, usize), String>),
    Progress { done: usize, total: usize },
    Warning(String),
    Fetched(Result<FetchReport, String>),
}

/// Forwards fetch progress to the UI thread.
struct ChannelProgress {
    sender: mpsc::Sender<Message>,
    ctx: egui::Context,
}

impl FetchProgress for ChannelProgress {
    fn on_attempt_failed(
        &self,
        _index: usize,
        attempt: u32,
        error: &DashboardError,
        will_retry: bool,
    ) {
        let text = if will_retry {
            format!("⚠ attempt {attempt} failed: {error}. Retrying...")
        } else {
            format!("❌ {error}")
        };
        let _ = self.sender.send(Message::Warning(text));
        self.ctx.request_repaint();
    }

    fn on_chunk_done(&self, index: usize, total: usize, _succeeded: bool) {
        let _ = self.sender.send(Message::Progress {
            done: index + 1,
            total,
        });
        self.ctx.request_repaint();
    }
}

/// Main application state
struct MacroApp {
    dashboard: Arc<Dashboard<Client>>,
    ctx: egui::Context,

    // Inputs
    countries: Vec<Country>,
    selected: usize,
    start_year: i32,
    end_year: i32,

    // Results
    report: Option<FetchReport>,
    chart_selection: Vec<(String, bool)>,
    chart_texture: Option<egui::TextureHandle>,
    chart_dirty: bool,

    // UI state
    is_loading: bool,
    progress: Option<(usize, usize)>,
    warnings: Vec<String>,
    status_message: String,
    error_message: String,

    // Background operation
    receiver: Option<mpsc::Receiver<Message>>,
}

impl MacroApp {
    fn new(dashboard: Arc<Dashboard<Client>>, ctx: egui::Context) -> Self {
        let config = dashboard.config().clone();
        let mut app = Self {
            dashboard,
            ctx,
            countries: Vec::new(),
            selected: 0,
            start_year: config.start_year,
            end_year: config.end_year,
            report: None,
            chart_selection: Vec::new(),
            chart_texture: None,
            chart_dirty: false,
            is_loading: false,
            progress: None,
            warnings: Vec::new(),
            status_message: String::new(),
            error_message: String::new(),
            receiver: None,
        };
        app.load_countries();
        app
    }

    fn spawn<F>(&mut self, job: F)
    where
        F: FnOnce(mpsc::Sender<Message>, egui::Context) + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel();
        self.receiver = Some(receiver);
        self.is_loading = true;
        let ctx = self.ctx.clone();
        thread::spawn(move || job(sender, ctx));
    }

    fn load_countries(&mut self) {
        self.status_message = "Loading country list from World Bank API...".to_string();
        let dashboard = Arc::clone(&self.dashboard);
        self.spawn(move |sender, ctx| {
            let result = dashboard
                .countries()
                .and_then(|list| {
                    let preselect = dashboard.directory().default_index(DEFAULT_COUNTRY)?;
                    Ok((list.to_vec(), preselect))
                })
                .map_err(|e| e.to_string());
            let _ = sender.send(Message::Countries(result));
            ctx.request_repaint();
        });
    }

    fn selected_country(&self) -> Option<&Country> {
        self.countries.get(self.selected)
    }

    fn start_fetch(&mut self) {
        let Some(country) = self.selected_country() else {
            self.error_message = "No country selected".to_string();
            return;
        };
        let name = country.name.clone();
        let config = DashboardConfig {
            start_year: self.start_year,
            end_year: self.end_year,
            ..self.dashboard.config().clone()
        };
        if let Err(err) = config.validate() {
            self.error_message = format!("Validation error: {}", err);
            return;
        }

        self.error_message.clear();
        self.warnings.clear();
        self.progress = Some((0, 0));
        self.status_message = format!("Fetching World Bank data for {name}...");

        let dashboard = Arc::clone(&self.dashboard);
        self.spawn(move |sender, ctx| {
            let progress = ChannelProgress {
                sender: sender.clone(),
                ctx: ctx.clone(),
            };
            let result = dashboard
                .fetch_country_with(&name, &config, &progress)
                .map_err(|e| e.to_string());
            let _ = sender.send(Message::Fetched(result));
            ctx.request_repaint();
        });
    }

    fn check_messages(&mut self) {
        let Some(receiver) = &self.receiver else {
            return;
        };
        let mut finished = false;
        let mut incoming = Vec::new();
        while let Ok(msg) = receiver.try_recv() {
            incoming.push(msg);
        }
        for msg in incoming {
            match msg {
                Message::Countries(Ok((countries, preselect))) => {
                    self.selected = preselect;
                    self.status_message = format!("{} countries available", countries.len());
                    self.countries = countries;
                    finished = true;
                }
                Message::Countries(Err(err)) => {
                    self.error_message = format!("Failed to load countries: {err}");
                    self.status_message.clear();
                    finished = true;
                }
                Message::Progress { done, total } => self.progress = Some((done, total)),
                Message::Warning(w) => self.warnings.push(w),
                Message::Fetched(Ok(report)) => {
                    self.status_message =
                        format!("Data successfully fetched for {}!", report.country.name);
                    let defaults = report.default_chart_series();
                    self.chart_selection = report
                        .table
                        .columns()
                        .iter()
                        .map(|c| (c.clone(), defaults.contains(c)))
                        .collect();
                    self.report = Some(report);
                    self.chart_dirty = true;
                    finished = true;
                }
                Message::Fetched(Err(err)) => {
                    self.error_message = err;
                    self.status_message.clear();
                    self.report = None;
                    self.chart_texture = None;
                    finished = true;
                }
            }
        }
        if finished {
            self.is_loading = false;
            self.progress = None;
            self.receiver = None;
        }
    }

    fn refresh_chart(&mut self) {
        if !self.chart_dirty {
            return;
        }
        self.chart_dirty = false;
        self.chart_texture = None;
        let Some(report) = &self.report else {
            return;
        };
        let series: Vec<&str> = self
            .chart_selection
            .iter()
            .filter(|(_, on)| *on)
            .map(|(label, _)| label.as_str())
            .collect();
        if series.is_empty() {
            return;
        }
        let [w, h] = CHART_SIZE;
        match viz::render_rgb(&report.table, &series, w as u32, h as u32, viz::DEFAULT_TITLE) {
            Ok(buf) => {
                let image = egui::ColorImage::from_rgb([w, h], &buf);
                self.chart_texture =
                    Some(self.ctx.load_texture("chart", image, egui::TextureOptions::LINEAR));
            }
            Err(err) => {
                log::warn!("chart rendering failed: {err:#}");
                self.error_message = format!("Failed to draw chart: {err}");
            }
        }
    }

    fn download(&mut self) {
        let Some(report) = &self.report else {
            return;
        };
        let default_dir = dirs::download_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        let Some(path) = rfd::FileDialog::new()
            .set_directory(default_dir)
            .set_file_name(report.export_file_name())
            .add_filter("Excel workbook", &["xlsx"])
            .save_file()
        else {
            return;
        };
        match storage::save_xlsx(&report.table, &path) {
            Ok(()) => self.status_message = format!("Saved {}", path.display()),
            Err(err) => self.error_message = err.to_string(),
        }
    }

    fn table_ui(ui: &mut egui::Ui, report: &FetchReport) {
        let table = &report.table;
        if table.years().is_empty() {
            ui.label("The provider returned no observations for this range.");
            return;
        }
        egui::ScrollArea::horizontal()
            .id_salt("macro_table")
            .show(ui, |ui| {
                egui::Grid::new("macro_grid")
                    .striped(true)
                    .min_col_width(60.0)
                    .show(ui, |ui| {
                        ui.strong("Year");
                        for c in table.columns() {
                            ui.strong(c);
                        }
                        ui.end_row();
                        for (year, row) in table.rows() {
                            ui.label(year.to_string());
                            for v in row {
                                ui.label(format_cell(*v));
                            }
                            ui.end_row();
                        }
                    });
            });
    }
}

impl eframe::App for MacroApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_messages();
        self.refresh_chart();

        if self.is_loading {
            ctx.request_repaint();
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("🌍 Country Review Dashboard");
                ui.label(format!(
                    "Select a country - key economic indicators ({}–{}).",
                    self.start_year, self.end_year
                ));
                ui.add_space(10.0);

                ui.group(|ui| {
                    ui.horizontal(|ui| {
                        ui.label("🌐 Country:");
                        let selected_text = self
                            .selected_country()
                            .map(|c| c.name.clone())
                            .unwrap_or_else(|| "(loading...)".to_string());
                        egui::ComboBox::from_id_salt("country")
                            .selected_text(selected_text)
                            .width(260.0)
                            .show_ui(ui, |ui| {
                                for (i, c) in self.countries.iter().enumerate() {
                                    ui.selectable_value(&mut self.selected, i, &c.name);
                                }
                            });
                    });

                    ui.horizontal(|ui| {
                        ui.label("Years:");
                        ui.add(egui::DragValue::new(&mut self.start_year).range(1960..=2030));
                        ui.label("to");
                        ui.add(egui::DragValue::new(&mut self.end_year).range(1960..=2030));
                    });
                });

                ui.add_space(10.0);

                ui.horizontal(|ui| {
                    let can_fetch = !self.is_loading && !self.countries.is_empty();
                    if ui
                        .add_enabled(can_fetch, egui::Button::new("📥 Fetch Data"))
                        .clicked()
                    {
                        self.start_fetch();
                    }
                    if self.countries.is_empty()
                        && !self.is_loading
                        && ui.button("Retry loading countries").clicked()
                    {
                        self.error_message.clear();
                        self.load_countries();
                    }
                    if self.is_loading {
                        ui.spinner();
                    }
                });

                if let Some((done, total)) = self.progress
                    && total > 0
                {
                    ui.add(
                        egui::ProgressBar::new(done as f32 / total as f32)
                            .text(format!("{done}/{total} chunks")),
                    );
                }

                if !self.status_message.is_empty() {
                    ui.colored_label(egui::Color32::DARK_GREEN, &self.status_message);
                }
                for w in &self.warnings {
                    ui.colored_label(egui::Color32::from_rgb(200, 120, 0), w);
                }
                if !self.error_message.is_empty() {
                    ui.colored_label(egui::Color32::RED, &self.error_message);
                }

                let Some(report) = &self.report else {
                    return;
                };

                ui.add_space(15.0);
                ui.heading(format!(
                    "📊 Macro Indicators ({}–{})",
                    self.start_year, self.end_year
                ));
                Self::table_ui(ui, report);

                ui.add_space(15.0);
                ui.heading("📈 Key Trends");
                ui.label("Select indicators to visualize:");
                let mut changed = false;
                ui.horizontal_wrapped(|ui| {
                    for (label, on) in self.chart_selection.iter_mut() {
                        changed |= ui.checkbox(on, label.as_str()).changed();
                    }
                });
                if changed {
                    self.chart_dirty = true;
                    ctx.request_repaint();
                }
                if let Some(texture) = &self.chart_texture {
                    ui.add(
                        egui::Image::new(egui::load::SizedTexture::from_handle(texture))
                            .max_width(ui.available_width()),
                    );
                }

                ui.add_space(15.0);
                if !report.table.years().is_empty()
                    && ui
                        .button("⬇ Download Data as Excel")
                        .on_hover_text(format!(
                            "{} ({})",
                            report.export_file_name(),
                            storage::XLSX_MIME
                        ))
                        .clicked()
                {
                    self.download();
                }
            });
        });
    }
}
