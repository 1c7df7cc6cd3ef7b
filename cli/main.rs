//! This module contains the main entrypoint to the pima cli.

use clap::{Args, Parser};
use colored::Colorize;
use pima_core::{
	ClientOptions, ClientOverrides, Config, Field, FieldValue, Outcome, PredictionClient,
	PredictionRequest, SchemaRevision,
};
use pima_deps::{env_logger, serde_json, tokio, url::Url};
use pima_util::error::Result;
use std::path::PathBuf;

#[derive(Parser)]
#[clap(
	about = "Predict diabetes from the eight Pima measurements.",
	disable_help_subcommand = true
)]
enum Options {
	#[cfg(feature = "app")]
	#[clap(name = "app")]
	App(Box<AppOptions>),
	#[clap(name = "predict")]
	Predict(Box<PredictOptions>),
}

/// Where predictions are sent and how long to wait for them.
#[derive(Args, Debug)]
struct ClientArgs {
	#[clap(long, env = "PIMA_API_URL", help = "the url of the prediction api")]
	api_url: Option<Url>,
	#[clap(
		long,
		env = "PIMA_SCHEMA",
		help = "the input contract of the prediction api: initial, pascal-keys or current"
	)]
	schema: Option<SchemaRevision>,
	#[clap(
		long = "timeout",
		env = "PIMA_TIMEOUT",
		help = "seconds to wait for the prediction api"
	)]
	timeout_secs: Option<u64>,
	#[clap(short, long, env = "PIMA_CONFIG", help = "the path to a config file")]
	config: Option<PathBuf>,
}

#[cfg(feature = "app")]
#[derive(Args, Debug)]
#[clap(about = "run the app")]
#[clap(long_about = "serve the prediction form over http")]
struct AppOptions {
	#[clap(long, default_value = "0.0.0.0")]
	host: std::net::IpAddr,
	#[clap(long, env = "PORT", default_value = "8080")]
	port: u16,
	#[clap(flatten)]
	client: ClientArgs,
}

#[derive(Args, Debug)]
#[clap(about = "make one prediction")]
#[clap(long_about = "send one set of measurements to the prediction api and print the result")]
struct PredictOptions {
	#[clap(long, help = "number of pregnancies, 0 to 17, defaults to 6")]
	pregnancies: Option<i64>,
	#[clap(long, help = "glucose in mg/dL, 0 to 199, defaults to 148")]
	glucose: Option<f64>,
	#[clap(long, help = "blood pressure in mmHg, 0 to 122, defaults to 72")]
	blood_pressure: Option<f64>,
	#[clap(long, help = "skin thickness in mm, 0 to 99, defaults to 35")]
	skin_thickness: Option<f64>,
	#[clap(long, help = "insulin in µU/mL, 0 to 846, defaults to 0")]
	insulin: Option<f64>,
	#[clap(long, help = "body mass index, 0 to 67.1, defaults to 33.6")]
	bmi: Option<f64>,
	#[clap(long, help = "diabetes pedigree function, 0.078 to 2.420, defaults to 0.627")]
	diabetes_pedigree: Option<f64>,
	#[clap(long, help = "age in years, 21 to 81, defaults to 50")]
	age: Option<i64>,
	#[clap(long, help = "print the request payload instead of sending it")]
	dry_run: bool,
	#[clap(flatten)]
	client: ClientArgs,
}

fn main() {
	let env = env_logger::Env::default()
		.default_filter_or("pima_app=info,pima_core=info,pima_util=info");
	env_logger::Builder::from_env(env)
		.format_level(false)
		.format_module_path(false)
		.format_timestamp(None)
		.init();
	let options = Options::parse();
	let result = match options {
		#[cfg(feature = "app")]
		Options::App(options) => cli_app(*options),
		Options::Predict(options) => cli_predict(*options),
	};
	if let Err(error) = result {
		eprintln!("{}: {}", "error".red().bold(), error);
		std::process::exit(1);
	}
}

#[cfg(feature = "app")]
fn cli_app(options: AppOptions) -> Result<()> {
	let client = client_options(options.client)?;
	pima_app::run(pima_app::Options {
		host: options.host,
		port: options.port,
		client,
	})
}

fn cli_predict(options: PredictOptions) -> Result<()> {
	let request = options.request();
	request.validate()?;
	let client_options = client_options(options.client)?;
	if options.dry_run {
		println!("{}", dry_run_payload(&request, client_options.schema)?);
		return Ok(());
	}
	let client = PredictionClient::new(client_options)?;
	eprintln!("Predicting...");
	let mut runtime = tokio::runtime::Builder::new()
		.basic_scheduler()
		.enable_all()
		.build()?;
	let result = runtime.block_on(client.predict(&request))?;
	match result.outcome() {
		Outcome::Positive => println!("{}", result.message().green()),
		Outcome::Cautionary => println!("{}", result.message().yellow()),
	}
	Ok(())
}

/// The JSON body that would be sent, pretty printed.
fn dry_run_payload(request: &PredictionRequest, schema: SchemaRevision) -> Result<String> {
	let payload = serde_json::Value::Object(request.payload(schema));
	Ok(serde_json::to_string_pretty(&payload)?)
}

impl PredictOptions {
	/// Start from the form defaults and apply each measurement given on the command line.
	fn request(&self) -> PredictionRequest {
		let mut request = PredictionRequest::default();
		let values = [
			(Field::Pregnancies, self.pregnancies.map(FieldValue::Integer)),
			(Field::Glucose, self.glucose.map(FieldValue::Decimal)),
			(Field::BloodPressure, self.blood_pressure.map(FieldValue::Decimal)),
			(Field::SkinThickness, self.skin_thickness.map(FieldValue::Decimal)),
			(Field::Insulin, self.insulin.map(FieldValue::Decimal)),
			(Field::Bmi, self.bmi.map(FieldValue::Decimal)),
			(
				Field::DiabetesPedigreeFunction,
				self.diabetes_pedigree.map(FieldValue::Decimal),
			),
			(Field::Age, self.age.map(FieldValue::Integer)),
		];
		for (field, value) in values.iter() {
			if let Some(value) = value {
				request.set(*field, *value);
			}
		}
		request
	}
}

fn client_options(args: ClientArgs) -> Result<ClientOptions> {
	let config = match args.config {
		Some(path) => Some(Config::load(&path)?),
		None => None,
	};
	let overrides = ClientOverrides {
		api_url: args.api_url,
		schema: args.schema,
		timeout_secs: args.timeout_secs,
	};
	let options = ClientOptions::resolve(overrides, config.as_ref())?;
	Ok(options)
}
