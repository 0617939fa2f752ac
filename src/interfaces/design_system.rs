use crate::domain::statistics::CorrelationBand;
use eframe::egui;

/// Dark dashboard theme
pub struct DesignSystem;

impl DesignSystem {
    // --- Colors ---

    // Backgrounds
    pub const BG_WINDOW: egui::Color32 = egui::Color32::from_rgb(10, 12, 16); // #0A0C10
    pub const BG_CARD: egui::Color32 = egui::Color32::from_rgb(22, 27, 34); // #161B22
    pub const BG_CARD_HOVER: egui::Color32 = egui::Color32::from_rgb(28, 33, 40);
    pub const BG_INPUT: egui::Color32 = egui::Color32::from_rgb(15, 18, 24);

    // Accents
    pub const ACCENT_PRIMARY: egui::Color32 = egui::Color32::from_rgb(41, 121, 255); // #2979FF
    pub const ACCENT_AVERAGE: egui::Color32 = egui::Color32::from_rgb(255, 145, 0);

    // Price moves
    pub const PRICE_UP: egui::Color32 = egui::Color32::from_rgb(0, 200, 83); // #00C853
    pub const PRICE_DOWN: egui::Color32 = egui::Color32::from_rgb(255, 23, 68); // #FF1744

    // Status
    pub const WARNING: egui::Color32 = egui::Color32::from_rgb(255, 145, 0); // #FF9100
    pub const WARNING_BG: egui::Color32 = egui::Color32::from_rgb(51, 36, 10);

    // Text
    pub const TEXT_PRIMARY: egui::Color32 = egui::Color32::from_rgb(240, 246, 252);
    pub const TEXT_SECONDARY: egui::Color32 = egui::Color32::from_gray(160);
    pub const TEXT_MUTED: egui::Color32 = egui::Color32::from_gray(100);
    pub const TEXT_ON_CELL: egui::Color32 = egui::Color32::WHITE;

    // Borders
    pub const BORDER_SUBTLE: egui::Color32 = egui::Color32::from_rgb(48, 54, 61);

    // --- Metrics ---

    pub const ROUNDING_SMALL: f32 = 4.0;
    pub const ROUNDING_MEDIUM: f32 = 8.0;

    pub const SPACING_SMALL: f32 = 8.0;
    pub const SPACING_MEDIUM: f32 = 16.0;
    pub const SPACING_LARGE: f32 = 24.0;

    pub const HEATMAP_CELL: f32 = 56.0;

    // --- Styles ---

    pub fn theme() -> egui::Visuals {
        let mut visuals = egui::Visuals::dark();

        visuals.window_fill = Self::BG_WINDOW;
        visuals.panel_fill = Self::BG_WINDOW;
        visuals.extreme_bg_color = Self::BG_INPUT;

        visuals.widgets.noninteractive.bg_stroke = egui::Stroke::new(1.0, Self::BORDER_SUBTLE);
        visuals.widgets.noninteractive.fg_stroke = egui::Stroke::new(1.0, Self::TEXT_PRIMARY);

        visuals.widgets.inactive.fg_stroke = egui::Stroke::new(1.0, Self::TEXT_SECONDARY);
        visuals.widgets.inactive.weak_bg_fill = Self::BG_CARD;
        visuals.widgets.inactive.bg_fill = Self::BG_CARD;
        visuals.widgets.hovered.bg_fill = Self::BG_CARD_HOVER;

        visuals.selection.bg_fill = Self::ACCENT_PRIMARY.linear_multiply(0.3);
        visuals.selection.stroke = egui::Stroke::new(1.0, Self::ACCENT_PRIMARY);

        visuals
    }

    pub fn card_frame() -> egui::Frame {
        egui::Frame::NONE
            .fill(Self::BG_CARD)
            .corner_radius(Self::ROUNDING_MEDIUM)
            .stroke(egui::Stroke::new(1.0, Self::BORDER_SUBTLE))
            .inner_margin(Self::SPACING_MEDIUM as i8)
    }

    pub fn main_frame() -> egui::Frame {
        egui::Frame::NONE
            .fill(Self::BG_WINDOW)
            .inner_margin(egui::Margin::same(Self::SPACING_LARGE as i8))
    }

    /// Heatmap cell colour: greens for positive, reds for negative, grey around zero.
    pub fn band_color(band: CorrelationBand) -> egui::Color32 {
        match band {
            CorrelationBand::StrongPositive => egui::Color32::from_rgb(21, 128, 61), // green-700
            CorrelationBand::Positive => egui::Color32::from_rgb(22, 163, 74),
            CorrelationBand::ModeratePositive => egui::Color32::from_rgb(34, 197, 94),
            CorrelationBand::WeakPositive => egui::Color32::from_rgb(74, 222, 128),
            CorrelationBand::Neutral => egui::Color32::from_rgb(107, 114, 128), // gray-500
            CorrelationBand::WeakNegative => egui::Color32::from_rgb(248, 113, 113),
            CorrelationBand::ModerateNegative => egui::Color32::from_rgb(239, 68, 68),
            CorrelationBand::Negative => egui::Color32::from_rgb(220, 38, 38),
            CorrelationBand::StrongNegative => egui::Color32::from_rgb(185, 28, 28), // red-700
        }
    }

    pub fn band_label(band: CorrelationBand) -> &'static str {
        match band {
            CorrelationBand::StrongNegative => "< -0.8",
            CorrelationBand::Negative => "-0.8",
            CorrelationBand::ModerateNegative => "-0.6",
            CorrelationBand::WeakNegative => "-0.4",
            CorrelationBand::Neutral => "0",
            CorrelationBand::WeakPositive => "0.2",
            CorrelationBand::ModeratePositive => "0.4",
            CorrelationBand::Positive => "0.6",
            CorrelationBand::StrongPositive => "> 0.8",
        }
    }
}
