use crate::layouts::document::Document;
use html::{html, Node};
use pima_core::{Field, FieldColumn, Outcome, PredictionResult};
use pima_deps::log;
use pima_ui as ui;
use std::collections::BTreeMap;

pub const TITLE: &str = "Pima Diabetes Predictor";

pub struct Props {
	/// The text shown in each input, in form order.
	pub values: Vec<(Field, String)>,
	pub notice: Option<Notice>,
}

/// What is shown below the form after a submission.
pub enum Notice {
	Prediction(PredictionResult),
	Invalid(Vec<String>),
	Failed(String),
}

impl Props {
	pub fn new() -> Props {
		let values = Field::all()
			.iter()
			.map(|field| (*field, field.spec().format(field.default_value())))
			.collect();
		Props {
			values,
			notice: None,
		}
	}

	/// Keep what the user typed so a rejected submission can be corrected in place.
	pub fn submitted(params: &BTreeMap<String, String>, notice: Notice) -> Props {
		let values = Field::all()
			.iter()
			.map(|field| {
				let value = match params.get(field.spec().name) {
					Some(value) => value.trim().to_owned(),
					None => field.spec().format(field.default_value()),
				};
				(*field, value)
			})
			.collect();
		Props {
			values,
			notice: Some(notice),
		}
	}
}

pub fn render(props: Props) -> String {
	let column = |column: FieldColumn| -> Vec<Node> {
		props
			.values
			.iter()
			.filter(|(field, _)| field.spec().column == column)
			.map(|(field, value)| {
				let spec = field.spec();
				html! {
					<ui::NumberField
						label={spec.label.to_owned()}
						name={spec.name.to_owned()}
						min={spec.format_min()}
						max={spec.format_max()}
						step={spec.format_step()}
						value={value.clone()}
					/>
				}
			})
			.collect()
	};
	let left = column(FieldColumn::Left);
	let right = column(FieldColumn::Right);
	let notice = props.notice.map(render_notice);
	let html = html! {
		<Document title={TITLE.to_owned()}>
			<ui::S1>
				<ui::H1>{TITLE}</ui::H1>
				<ui::P>{"Please enter the patient's details below."}</ui::P>
				<ui::Form id={Some("prediction_form".to_owned())}>
					<ui::Columns>
						<ui::S2>{left}</ui::S2>
						<ui::S2>{right}</ui::S2>
					</ui::Columns>
					<ui::SubmitButton id={Some("prediction_submit".to_owned())}>
						{"Get Prediction"}
					</ui::SubmitButton>
				</ui::Form>
				{notice}
			</ui::S1>
		</Document>
	};
	format!("<!doctype html>{}", html.render_to_string())
}

fn render_notice(notice: Notice) -> Node {
	match notice {
		Notice::Prediction(result) => {
			let level = match result.outcome() {
				Outcome::Positive => ui::Level::Success,
				Outcome::Cautionary => ui::Level::Warning,
			};
			html! {
				<ui::Alert level={level} title={None}>
					<strong>{format!("Prediction: {}", result.label)}</strong>
					{format!(" (Probability: {})", result.probability_text())}
				</ui::Alert>
			}
		}
		Notice::Invalid(errors) => {
			log::debug!("rejected submission: {}", errors.join(", "));
			html! {
				<ui::Alert
					level={ui::Level::Danger}
					title={Some("Please correct the following values.".to_owned())}
				>
					<ul class="alert-list">
						{errors.into_iter().map(|error| html! { <li>{error}</li> }).collect::<Vec<_>>()}
					</ul>
				</ui::Alert>
			}
		}
		Notice::Failed(message) => html! {
			<ui::Alert level={ui::Level::Danger} title={None}>
				{message}
			</ui::Alert>
		},
	}
}
