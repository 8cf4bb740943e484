use std::sync::mpsc::{self, Receiver};

use arbor_tree::{
    DropPosition, Node, NodeKind, add_node, export_to_json, move_node,
    remove_node, sort_tree,
};
use arbor_ui_tree::{
    NodeAction, TreeCallbacks, TreeEvent, TreeMessage, TreeOptions,
    TreeSettings, TreeWidget,
};
use env_logger::Env;
use iced::widget::{button, column, container, row, text};
use iced::{
    Element, Event, Length, Subscription, Task, Theme, event, keyboard, mouse,
};

const DELETE_ACTION: &str = "delete";

#[derive(Debug, Clone)]
enum Message {
    Tree(TreeMessage),
    Keyboard(keyboard::Event),
    Mouse(mouse::Event),
    AddFolder,
    SortByName,
    Export,
}

struct App {
    tree: TreeWidget,
    events: Receiver<TreeEvent>,
}

impl App {
    fn new() -> (Self, Task<Message>) {
        let (sender, events) = mpsc::channel();
        let mut tree = TreeWidget::new(TreeOptions {
            data: sample_tree(),
            settings: TreeSettings::default().with_icon("script", "📜"),
            actions: vec![
                NodeAction::new(DELETE_ACTION, "🗑", "Delete")
                    .with_condition(|node| !node.has_children()),
            ],
            callbacks: TreeCallbacks::forward_to(sender),
        });
        tree.set_expanded_node_ids([String::from("docs")]);
        (Self { tree, events }, Task::none())
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Tree(message) => self.tree.update(message),
            Message::Keyboard(event) => {
                if let Some(message) = TreeMessage::from_keyboard(&event) {
                    self.tree.update(message);
                }
            },
            Message::Mouse(event) => {
                if let Some(message) = TreeMessage::from_mouse(&event) {
                    self.tree.update(message);
                }
            },
            Message::AddFolder => {
                let parent = self
                    .tree
                    .selected_node()
                    .filter(|node| node.is_folder())
                    .map(|node| node.id.clone());
                let data = add_node(
                    self.tree.data(),
                    Node::folder("", "New folder"),
                    parent.as_deref(),
                );
                self.tree.update_data(data);
            },
            Message::SortByName => {
                let data = sort_tree(self.tree.data(), "name", true, true);
                self.tree.update_data(data);
            },
            Message::Export => match export_to_json(self.tree.data()) {
                Ok(json) => log::info!("exported tree:\n{json}"),
                Err(err) => log::error!("export failed: {err}"),
            },
        }

        self.apply_tree_events();
        Task::none()
    }

    /// Apply the edits requested by the widget since the last update.
    fn apply_tree_events(&mut self) {
        let events: Vec<TreeEvent> = self.events.try_iter().collect();
        for event in events {
            match event {
                TreeEvent::Dropped {
                    dragged,
                    target,
                    position,
                } => self.apply_drop(&dragged, &target, position),
                TreeEvent::Action { action_id, node }
                    if action_id == DELETE_ACTION =>
                {
                    let data = remove_node(self.tree.data(), &node.id);
                    self.tree.update_data(data);
                },
                TreeEvent::ContextMenu { node, position } => {
                    log::info!(
                        "context menu for {} at ({}, {})",
                        node.name,
                        position.x,
                        position.y
                    );
                },
                TreeEvent::Activated(node) => {
                    log::info!("opened {}", node.name)
                },
                other => log::debug!("tree event: {other:?}"),
            }
        }
    }

    fn apply_drop(
        &mut self,
        dragged: &Node,
        target: &Node,
        position: DropPosition,
    ) {
        let data =
            move_node(self.tree.data(), &dragged.id, &target.id, position);
        self.tree.update_data(data);
    }

    fn view(&self) -> Element<'_, Message, Theme, iced::Renderer> {
        let toolbar = row![
            button(text("New folder")).on_press(Message::AddFolder),
            button(text("Sort")).on_press(Message::SortByName),
            button(text("Expand"))
                .on_press(Message::Tree(TreeMessage::ExpandAll)),
            button(text("Collapse"))
                .on_press(Message::Tree(TreeMessage::CollapseAll)),
            button(text("Export")).on_press(Message::Export),
        ]
        .spacing(6);

        let tree = arbor_ui_tree::view(&self.tree).map(Message::Tree);

        container(column![toolbar, tree].spacing(8))
            .padding(12)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn subscription(&self) -> Subscription<Message> {
        let key_subs = keyboard::listen().map(Message::Keyboard);
        let mouse_subs = event::listen_with(|event, _status, _window| {
            match event {
                Event::Mouse(event) => Some(Message::Mouse(event)),
                _ => None,
            }
        });

        Subscription::batch(vec![key_subs, mouse_subs])
    }
}

fn sample_tree() -> Vec<Node> {
    vec![
        Node::folder("docs", "Documents").with_children(vec![
            Node::file("cv", "cv.pdf"),
            Node::file("notes", "notes 10.txt"),
            Node::file("notes2", "notes 9.txt"),
        ]),
        Node::folder("scripts", "Scripts").with_children(vec![
            Node::new(
                "deploy",
                "deploy.sh",
                NodeKind::Other(String::from("script")),
            ),
        ]),
        Node::file("todo", "todo.txt"),
    ]
}

fn main() -> iced::Result {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    iced::application(App::new, App::update, App::view)
        .title("Arbor tree")
        .subscription(App::subscription)
        .run()
}
