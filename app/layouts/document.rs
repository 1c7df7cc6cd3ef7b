use html::{component, html, raw};

const STYLES: &str = include_str!("../styles.css");

/// Disable the submit button while a submission is in flight so the form cannot be submitted twice.
const SCRIPT: &str = r#"
var form = document.getElementById("prediction_form");
if (form) {
	form.addEventListener("submit", function () {
		var button = document.getElementById("prediction_submit");
		button.disabled = true;
		button.textContent = "Predicting...";
	});
}
"#;

#[component]
pub fn Document(title: String) {
	html! {
		<html lang="en">
			<head>
				<meta charset="utf-8" />
				<meta content="width=device-width, initial-scale=1" name="viewport" />
				<title>{title}</title>
				<style>{raw!(STYLES)}</style>
			</head>
			<body>
				<main class="document">
					{children}
				</main>
				<script>{raw!(SCRIPT)}</script>
			</body>
		</html>
	}
}
