pub mod add;
pub mod history;
pub mod init;
pub mod langs;
pub mod new;
pub mod reset;
pub mod stress;
pub mod test;

#[derive(Debug, clap::Parser)]
#[command(author, version, about, long_about = None)]
pub struct GlobalArgs {
    #[command(subcommand)]
    pub subcmd: Subcommand,

    /// Piston API base URL, overriding every config file
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

#[derive(Debug, clap::Subcommand)]
pub enum Subcommand {
    Add(add::Args),
    History(history::Args),
    Init(init::Args),
    Langs(langs::Args),
    New(new::Args),
    Reset(reset::Args),

    #[command(alias("s"))]
    Stress(stress::Args),

    #[command(alias("t"))]
    Test(test::Args),
}

pub type SubcmdResult = anyhow::Result<()>;

impl GlobalArgs {
    pub async fn exec_subcmd(&self) -> SubcmdResult {
        use Subcommand::*;
        match &self.subcmd {
            Add(args) => add::exec(args, self),
            History(args) => history::exec(args, self),
            Init(args) => init::exec(args, self),
            Langs(args) => langs::exec(args, self).await,
            New(args) => new::exec(args, self),
            Reset(args) => reset::exec(args, self),
            Stress(args) => stress::exec(args, self).await,
            Test(args) => test::exec(args, self).await,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
#[clap(rename_all = "lower")]
pub enum ArgLanguage {
    Cpp,
    Python,
    Java,
    JavaScript,
}

impl From<ArgLanguage> for cph_webclient::Language {
    fn from(value: ArgLanguage) -> Self {
        use cph_webclient::Language;
        use ArgLanguage::*;
        match value {
            Cpp => Language::Cpp,
            Python => Language::Python,
            Java => Language::Java,
            JavaScript => Language::JavaScript,
        }
    }
}

impl From<&ArgLanguage> for cph_webclient::Language {
    fn from(&value: &ArgLanguage) -> Self {
        value.into()
    }
}
