use iced::widget::{
    Column, Row, Space, button, column, container, mouse_area, row,
    scrollable, stack, text, text_input, tooltip,
};
use iced::{Color, Element, Length, Padding, Theme, alignment, mouse};

use arbor_tree::DropPosition;

use crate::drag::DropIndicator;
use crate::event::TreeMessage;
use crate::rows::{LabelSegment, RowPresentation};
use crate::settings::NodeAction;
use crate::widget::TreeWidget;

const TREE_FONT_SIZE: f32 = 12.0;
const TOGGLE_WIDTH: f32 = 14.0;
const ICON_WIDTH: f32 = 18.0;
const EXPANDED_GLYPH: &str = "▾";
const COLLAPSED_GLYPH: &str = "▸";
const CLEAR_GLYPH: &str = "✕";

/// Render the filter bar and the visible rows of a tree widget.
pub fn view(
    widget: &TreeWidget,
) -> Element<'_, TreeMessage, Theme, iced::Renderer> {
    let mut content = Column::new().width(Length::Fill).height(Length::Fill);
    if widget.settings().search_enabled() {
        content = content.push(filter_bar(widget));
    }
    content.push(rows_area(widget)).into()
}

fn filter_bar(
    widget: &TreeWidget,
) -> Element<'_, TreeMessage, Theme, iced::Renderer> {
    let input = text_input(
        widget.settings().search_placeholder(),
        widget.filter_text(),
    )
    .on_input(TreeMessage::FilterChanged)
    .size(TREE_FONT_SIZE)
    .padding([4, 8]);

    let mut bar = row![input]
        .spacing(4)
        .align_y(alignment::Vertical::Center);
    if !widget.filter_text().is_empty() {
        bar = bar.push(
            button(text(CLEAR_GLYPH).size(TREE_FONT_SIZE))
                .padding([2, 6])
                .style(button::text)
                .on_press(TreeMessage::FilterCleared),
        );
    }

    container(bar).padding(4).width(Length::Fill).into()
}

fn rows_area(
    widget: &TreeWidget,
) -> Element<'_, TreeMessage, Theme, iced::Renderer> {
    if widget.row_count() == 0 {
        return container(
            text(widget.settings().empty_text()).size(TREE_FONT_SIZE),
        )
        .padding(8)
        .width(Length::Fill)
        .height(Length::Fill)
        .align_x(alignment::Horizontal::Center)
        .into();
    }

    let entries: Vec<Element<'_, TreeMessage, Theme, iced::Renderer>> = widget
        .rendered_rows()
        .enumerate()
        .map(|(index, presentation)| render_row(widget, index, presentation))
        .collect();
    let list = column(entries).width(Length::Fill).spacing(0);

    let layered: Element<'_, TreeMessage, Theme, iced::Renderer> =
        match widget.drop_indicator() {
            Some(indicator) => stack![list, render_indicator(indicator)]
                .width(Length::Fill)
                .into(),
            None => list.into(),
        };

    // Pointer coordinates are reported relative to the row list so they
    // line up with row indices.
    let tracked = mouse_area(layered)
        .on_move(TreeMessage::CursorMoved)
        .on_exit(TreeMessage::CursorLeft);

    // Releases are caught over the whole area, including the space below
    // the last row, so a drag always ends.
    mouse_area(
        scrollable(tracked)
            .width(Length::Fill)
            .height(Length::Fill),
    )
    .on_release(TreeMessage::PointerReleased)
    .into()
}

fn render_row<'a>(
    widget: &'a TreeWidget,
    index: usize,
    presentation: &'a RowPresentation,
) -> Element<'a, TreeMessage, Theme, iced::Renderer> {
    let settings = widget.settings();
    let row_height = settings.row_height();
    let indent = presentation.depth as f32 * settings.indent_width();
    let expanded = widget.is_expanded(&presentation.id);
    let is_selected = widget.selected_id() == Some(presentation.id.as_str());
    let is_dragged =
        widget.drag_session().source() == Some(presentation.id.as_str());

    // The toggle is its own button so pressing it never starts a drag.
    let toggle: Element<'a, TreeMessage, Theme, iced::Renderer> =
        if presentation.has_children {
            let glyph = if expanded {
                EXPANDED_GLYPH
            } else {
                COLLAPSED_GLYPH
            };
            button(text(glyph).size(TREE_FONT_SIZE))
                .padding(0)
                .width(Length::Fixed(TOGGLE_WIDTH))
                .style(button::text)
                .on_press(TreeMessage::ToggleClicked(index))
                .into()
        } else {
            Space::new().width(Length::Fixed(TOGGLE_WIDTH)).into()
        };

    let icon = container(
        text(presentation.icon.glyph(expanded)).size(TREE_FONT_SIZE),
    )
    .width(Length::Fixed(ICON_WIDTH))
    .height(Length::Fixed(row_height))
    .align_x(alignment::Horizontal::Center)
    .align_y(alignment::Vertical::Center);

    let label = Row::with_children(
        presentation.label.iter().map(render_label_segment),
    )
    .align_y(alignment::Vertical::Center);

    let mut row_content = row![
        Space::new().width(Length::Fixed(indent)),
        toggle,
        icon,
        label,
        Space::new().width(Length::Fill),
    ]
    .align_y(alignment::Vertical::Center)
    .width(Length::Fill)
    .height(Length::Fixed(row_height));

    for action_id in &presentation.actions {
        if let Some(action) = widget.action(action_id) {
            row_content = row_content.push(render_action(index, action));
        }
    }

    let styled_row = container(row_content)
        .width(Length::Fill)
        .height(Length::Fixed(row_height))
        .padding(Padding {
            top: 0.0,
            right: 4.0,
            bottom: 0.0,
            left: 0.0,
        })
        .style(move |theme: &Theme| row_style(theme, is_selected, is_dragged));

    mouse_area(styled_row)
        .on_press(TreeMessage::RowPressed(index))
        .on_right_press(TreeMessage::RowRightClicked(index))
        .interaction(mouse::Interaction::Pointer)
        .into()
}

fn render_label_segment(
    segment: &LabelSegment,
) -> Element<'_, TreeMessage, Theme, iced::Renderer> {
    let label = text(segment.text.as_str()).size(TREE_FONT_SIZE);
    if segment.highlighted {
        container(label).style(highlight_style).into()
    } else {
        label.into()
    }
}

fn render_action(
    index: usize,
    action: &NodeAction,
) -> Element<'_, TreeMessage, Theme, iced::Renderer> {
    let control = button(text(action.icon()).size(TREE_FONT_SIZE))
        .padding([0, 4])
        .style(button::text)
        .on_press(TreeMessage::ActionClicked {
            row: index,
            action_id: action.id().to_owned(),
        });

    tooltip(
        control,
        container(text(action.title()).size(TREE_FONT_SIZE))
            .padding([2, 6])
            .style(container::rounded_box),
        tooltip::Position::Bottom,
    )
    .into()
}

fn render_indicator<'a>(
    indicator: DropIndicator,
) -> Element<'a, TreeMessage, Theme, iced::Renderer> {
    let bounds = indicator.bounds(0.0);
    let position = indicator.position;

    let marker = container(Space::new())
        .width(Length::Fill)
        .height(Length::Fixed(bounds.height))
        .style(move |theme: &Theme| indicator_style(theme, position));

    container(marker)
        .width(Length::Fill)
        .padding(Padding {
            top: bounds.y.max(0.0),
            right: 0.0,
            bottom: 0.0,
            left: 0.0,
        })
        .into()
}

fn row_style(
    theme: &Theme,
    is_selected: bool,
    is_dragged: bool,
) -> container::Style {
    let palette = theme.extended_palette();
    let background = if is_selected {
        Some(palette.primary.weak.color)
    } else {
        None
    };
    let mut text_color = if is_selected {
        palette.primary.weak.text
    } else {
        palette.background.base.text
    };
    if is_dragged {
        text_color.a = 0.5;
    }

    container::Style {
        background: background.map(Into::into),
        text_color: Some(text_color),
        ..Default::default()
    }
}

fn highlight_style(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();
    let mut background = palette.primary.base.color;
    background.a = 0.35;

    container::Style {
        background: Some(background.into()),
        border: iced::Border {
            radius: 2.0.into(),
            ..Default::default()
        },
        ..Default::default()
    }
}

fn indicator_style(theme: &Theme, position: DropPosition) -> container::Style {
    let accent = theme.extended_palette().primary.strong.color;
    match position {
        DropPosition::Inside => container::Style {
            background: Some(
                Color {
                    a: 0.15,
                    ..accent
                }
                .into(),
            ),
            border: iced::Border {
                width: 1.0,
                color: accent,
                radius: 3.0.into(),
            },
            ..Default::default()
        },
        DropPosition::Before | DropPosition::After => container::Style {
            background: Some(accent.into()),
            ..Default::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use arbor_tree::Node;

    use super::*;
    use crate::settings::TreeSettings;
    use crate::widget::TreeOptions;

    #[test]
    fn given_empty_tree_when_viewed_then_element_is_built() {
        let widget = TreeWidget::new(TreeOptions::default());
        let _element = view(&widget);
    }

    #[test]
    fn given_rows_and_filter_when_viewed_then_element_is_built() {
        let mut widget = TreeWidget::new(TreeOptions {
            data: vec![
                Node::folder("a", "Alpha")
                    .with_children(vec![Node::file("b", "beta.txt")]),
            ],
            settings: TreeSettings::default(),
            actions: vec![NodeAction::new("rm", "🗑", "Delete")],
            ..Default::default()
        });
        widget.filter_tree("bet");
        widget.press_row(1);
        widget.move_pointer(iced::Point::new(4.0, 2.0));
        assert!(widget.drop_indicator().is_some());
        let _element = view(&widget);
    }

    #[test]
    fn given_positions_when_styling_indicator_then_inside_is_outlined() {
        let theme = Theme::Dark;
        let inside = indicator_style(&theme, DropPosition::Inside);
        let line = indicator_style(&theme, DropPosition::After);
        assert!(inside.border.width > 0.0);
        assert_eq!(line.border.width, 0.0);
    }
}
