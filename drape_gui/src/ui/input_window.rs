//! Input view for a single window
//!
//! Displays:
//! - Measurements (space, width, height, mount, curtain box)
//! - Product details (opening, curtain type, track, fabric, sheer, power)
//! - Pricing (material options, installation surcharge, live totals)
//! - Notes and the site photo

use iced::widget::{button, column, radio, row, rule, text, Column, Row, Space};
use iced::{Alignment, Element, Length, Padding};

use drape_core::units::{format_currency, format_plain};
use drape_core::window::{InstallMethod, MountType, WindowRecord};
use drape_core::WindowField;

use super::shared::{labeled_input, labeled_value, section_heading, LABEL_WIDTH};
use crate::{number_text, App, FieldKey, Message};

/// Text fields in form order with their labels
const DETAIL_FIELDS: [(WindowField, &str); 6] = [
    (WindowField::OpeningStyle, "開法:"),
    (WindowField::CurtainType, "窗簾種類:"),
    (WindowField::TrackInfo, "軌道種類:"),
    (WindowField::FabricModel, "布料型號:"),
    (WindowField::SheerInfo, "紗料:"),
    (WindowField::PowerRequirement, "電源需求:"),
];

const NOTE_FIELDS: [(WindowField, &str); 3] = [
    (WindowField::Remarks, "備註:"),
    (WindowField::InstallReminder, "施工提醒:"),
    (WindowField::FactoryNotes, "工廠備註:"),
];

/// The stored value of a text field, as shown before the user edits it.
pub fn stored_text(window: &WindowRecord, field: WindowField) -> String {
    match field {
        WindowField::FloorSpace => window.floor_space.clone(),
        WindowField::Width => number_text(window.width_cm),
        WindowField::Height => number_text(window.height_cm),
        WindowField::CurtainBoxDepth => number_text(window.curtain_box.depth_cm),
        WindowField::OpeningStyle => window.opening_style.clone(),
        WindowField::CurtainType => window.curtain_type.clone(),
        WindowField::TrackInfo => window.track_info.clone(),
        WindowField::FabricModel => window.fabric_model.clone(),
        WindowField::SheerInfo => window.sheer_info.clone(),
        WindowField::PowerRequirement => window.power_requirement.clone(),
        WindowField::Remarks => window.remarks.clone(),
        WindowField::InstallReminder => window.install_reminder.clone(),
        WindowField::FactoryNotes => window.factory_notes.clone(),
        WindowField::MaterialLabel(index) => window.material(index).map(|m| m.label.clone()).unwrap_or_default(),
        WindowField::MaterialUnitPrice(index) => {
            window.material(index).map(|m| number_text(m.unit_price)).unwrap_or_default()
        }
        WindowField::WallMountCost => number_text(window.wall_mount_cost),
        WindowField::CeilingMountCost => number_text(window.ceiling_mount_cost),
        // Choice fields are not typed
        WindowField::MountType
        | WindowField::CurtainBox
        | WindowField::SitePhoto
        | WindowField::MaterialSelection
        | WindowField::InstallMethod => String::new(),
    }
}

/// Text input bound to a window field
fn window_input<'a>(app: &App, id: u32, field: WindowField, label: &'a str) -> Element<'a, Message> {
    let value = app.field_text(FieldKey::Window(id, field));
    labeled_input(label, &value, move |v| Message::WindowFieldChanged(id, field, v))
}

/// Render the window editor
pub fn view<'a>(app: &'a App, window: &'a WindowRecord) -> Column<'a, Message> {
    let id = window.id;

    let header = row![
        text(window.title()).size(14),
        Space::new().width(Length::Fill),
        button(text("Remove Window").size(11))
            .on_press(Message::RequestRemoveWindow(id))
            .padding(Padding::from([4, 8]))
            .style(button::secondary),
    ]
    .align_y(Alignment::Center);

    column![
        header,
        Space::new().height(8),
        view_measurements(app, window),
        Space::new().height(10),
        rule::horizontal(1),
        view_details(app, id),
        Space::new().height(10),
        rule::horizontal(1),
        view_pricing(app, window),
        Space::new().height(10),
        rule::horizontal(1),
        view_notes(app, window),
    ]
    .spacing(6)
}

fn view_measurements<'a>(app: &App, window: &'a WindowRecord) -> Element<'a, Message> {
    let id = window.id;

    let mount_radios = MountType::ALL.iter().fold(Row::<Message>::new().spacing(12), |r, mount| {
        r.push(
            radio(mount.label(), *mount, Some(window.mount_type), move |m| {
                Message::MountTypeSelected(id, m)
            })
            .size(14)
            .text_size(11),
        )
    });

    let present = window.curtain_box.present;
    let mut curtain_box = row![
        text("窗簾盒:").size(11).width(Length::Fixed(LABEL_WIDTH)),
        radio("有", true, Some(present), move |b| Message::CurtainBoxSelected(id, b))
            .size(14)
            .text_size(11),
        Space::new().width(12),
        radio("無", false, Some(present), move |b| Message::CurtainBoxSelected(id, b))
            .size(14)
            .text_size(11),
    ]
    .align_y(Alignment::Center);

    if present {
        let depth = app.field_text(FieldKey::Window(id, WindowField::CurtainBoxDepth));
        curtain_box = curtain_box.push(Space::new().width(16)).push(
            labeled_input("深度 (cm):", &depth, move |v| {
                Message::WindowFieldChanged(id, WindowField::CurtainBoxDepth, v)
            }),
        );
    }

    column![
        section_heading("丈量"),
        window_input(app, id, WindowField::FloorSpace, "樓層/空間:"),
        window_input(app, id, WindowField::Width, "寬 (cm):"),
        window_input(app, id, WindowField::Height, "高 (cm):"),
        row![text("框內/框外:").size(11).width(Length::Fixed(LABEL_WIDTH)), mount_radios]
            .align_y(Alignment::Center),
        curtain_box,
    ]
    .spacing(6)
    .into()
}

fn view_details<'a>(app: &App, id: u32) -> Element<'a, Message> {
    DETAIL_FIELDS
        .iter()
        .fold(column![section_heading("規格")].spacing(6), |col, (field, label)| {
            col.push(window_input(app, id, *field, *label))
        })
        .into()
}

fn view_pricing<'a>(app: &App, window: &'a WindowRecord) -> Element<'a, Message> {
    let id = window.id;
    let costs = &window.costs;

    let mut pricing = column![
        section_heading("報價"),
        labeled_value("面積:", format!("{:.2} 才", costs.area_tsai)),
        row![
            Space::new().width(24),
            text("材質").size(10).color([0.5, 0.5, 0.5]).width(Length::FillPortion(3)),
            text("單價 /才").size(10).color([0.5, 0.5, 0.5]).width(Length::FillPortion(2)),
            text("小計").size(10).color([0.5, 0.5, 0.5]).width(Length::FillPortion(2)),
        ]
        .spacing(6),
    ]
    .spacing(6);

    for option in &window.materials {
        let index = option.index;
        let label = app.field_text(FieldKey::Window(id, WindowField::MaterialLabel(index)));
        let price = app.field_text(FieldKey::Window(id, WindowField::MaterialUnitPrice(index)));
        let option_total = costs
            .option_totals
            .iter()
            .find(|t| t.index == index)
            .map(|t| t.total)
            .unwrap_or(0.0);

        pricing = pricing.push(
            row![
                radio("", Some(index), Some(window.selected_material), move |sel| {
                    Message::MaterialSelected(id, sel)
                })
                .size(14)
                .width(Length::Fixed(24.0)),
                iced::widget::text_input("", &label)
                    .on_input(move |v| Message::WindowFieldChanged(id, WindowField::MaterialLabel(index), v))
                    .padding(4)
                    .size(11)
                    .width(Length::FillPortion(3)),
                iced::widget::text_input("0", &price)
                    .on_input(move |v| Message::WindowFieldChanged(id, WindowField::MaterialUnitPrice(index), v))
                    .padding(4)
                    .size(11)
                    .width(Length::FillPortion(2)),
                text(format_currency(option_total)).size(11).width(Length::FillPortion(2)),
            ]
            .spacing(6)
            .align_y(Alignment::Center),
        );
    }

    pricing = pricing.push(
        radio("未選擇", None, Some(window.selected_material), move |sel| {
            Message::MaterialSelected(id, sel)
        })
        .size(14)
        .text_size(11),
    );

    let install_radios = InstallMethod::ALL.iter().fold(Row::<Message>::new().spacing(12), |r, method| {
        r.push(
            radio(method.label(), *method, Some(window.install_method), move |m| {
                Message::InstallMethodSelected(id, m)
            })
            .size(14)
            .text_size(11),
        )
    });

    let unit_price = if window.selected_option().is_some() {
        format!("{} /才", format_plain(costs.selected_unit_price))
    } else {
        "-".to_string()
    };

    pricing
        .push(Space::new().height(4))
        .push(
            row![text("安裝方式:").size(11).width(Length::Fixed(LABEL_WIDTH)), install_radios]
                .align_y(Alignment::Center),
        )
        .push(window_input(app, id, WindowField::WallMountCost, "牆裝加價:"))
        .push(window_input(app, id, WindowField::CeilingMountCost, "天花板裝加價:"))
        .push(Space::new().height(4))
        .push(labeled_value("材質單價:", unit_price))
        .push(labeled_value("材質小計:", format_currency(costs.selected_material_cost)))
        .push(labeled_value("安裝加價:", format_currency(costs.install_cost)))
        .push(labeled_value("窗戶小計:", format_currency(costs.grand_total)))
        .into()
}

fn view_notes<'a>(app: &App, window: &'a WindowRecord) -> Element<'a, Message> {
    let id = window.id;

    let notes = NOTE_FIELDS
        .iter()
        .fold(column![section_heading("備註")].spacing(6), |col, (field, label)| {
            col.push(window_input(app, id, *field, *label))
        });

    let mut photo = row![
        text("現場照片:").size(11).width(Length::Fixed(LABEL_WIDTH)),
        text(window.site_photo_name()).size(11),
        Space::new().width(Length::Fill),
        button(text("Choose...").size(11))
            .on_press(Message::PickSitePhoto(id))
            .padding(Padding::from([4, 8]))
            .style(button::secondary),
    ]
    .spacing(4)
    .align_y(Alignment::Center);

    if window.site_photo.is_some() {
        photo = photo.push(
            button(text("Clear").size(11))
                .on_press(Message::ClearSitePhoto(id))
                .padding(Padding::from([4, 8]))
                .style(button::text),
        );
    }

    notes.push(photo).into()
}
