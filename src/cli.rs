//! 命令行参数
//!
//! 每个参数接受多种写法（大小写、单/双短横线、长短形式）

use std::path::PathBuf;

use phf::phf_set;
use tracing::warn;

use crate::error::ArgsError;

static INFILE_FLAGS: phf::Set<&'static str> =
    phf_set! { "-i", "-I", "--i", "--I", "-infile", "--infile" };
static OUTFILE_FLAGS: phf::Set<&'static str> =
    phf_set! { "-o", "-O", "--o", "--O", "-ofile", "--ofile" };
static SETTINGS_FLAGS: phf::Set<&'static str> =
    phf_set! { "-c", "-C", "--c", "--C", "-config", "--config" };
static HELP_FLAGS: phf::Set<&'static str> =
    phf_set! { "-h", "-H", "-help", "--h", "--H", "--help" };

/// 解析后的路径参数
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliArgs {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub settings: Option<PathBuf>,
}

/// 命令行解析结果
#[derive(Debug)]
pub enum CliCommand {
    /// 正常运行
    Run(CliArgs),
    /// 显示帮助后退出
    Help,
    /// 参数用法错误：警告、显示帮助后退出
    Malformed(ArgsError),
}

/// 解析参数（不含程序名）
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = CliArgs::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        let flag = arg.as_str();
        if HELP_FLAGS.contains(flag) {
            return CliCommand::Help;
        }

        let slot = if INFILE_FLAGS.contains(flag) {
            &mut parsed.input
        } else if OUTFILE_FLAGS.contains(flag) {
            &mut parsed.output
        } else if SETTINGS_FLAGS.contains(flag) {
            &mut parsed.settings
        } else {
            warn!("忽略无法识别的参数: {}", arg);
            continue;
        };

        match args.next() {
            Some(value) => *slot = Some(PathBuf::from(value)),
            None => return CliCommand::Malformed(ArgsError::MissingValue { flag: arg }),
        }
    }

    CliCommand::Run(parsed)
}

fn flag_list(set: &phf::Set<&'static str>) -> String {
    let mut flags: Vec<&str> = set.iter().copied().collect();
    flags.sort_by_key(|f| (f.len(), f.to_lowercase(), f.chars().any(char::is_uppercase)));
    flags.join(", ")
}

/// 帮助文本
pub fn help_text(target_url: &str) -> String {
    let bar = "=".repeat(80);
    format!(
        "{bar}\n\
         QSAR 批量运行器 (版本 {version}) 帮助\n\
         {bar}\n\n\
         通过网页界面批量运行 QSAR 模型:\n    ({target_url})\n\n\
         用法: qsar_batch [选项]\n\n\
         == 选项 ==\n\n\
         输入文件:  [{infile}]\n    用法: -i $FILEPATH  (默认: SMILES.txt)\n\n\
         输出文件:  [{outfile}]\n    用法: -o $FILEPATH  (默认: $INFILE.csv)\n\n\
         设置文件:  [{settings}]\n    用法: -c $FILEPATH  (TOML，可选)\n\n\
         帮助:      [{help}]\n\
         {bar}",
        version = env!("CARGO_PKG_VERSION"),
        infile = flag_list(&INFILE_FLAGS),
        outfile = flag_list(&OUTFILE_FLAGS),
        settings = flag_list(&SETTINGS_FLAGS),
        help = flag_list(&HELP_FLAGS),
    )
}

/// 参数用法错误的警告横幅
pub fn misuse_banner(err: &ArgsError) -> String {
    let bar = "!".repeat(80);
    format!("{bar}\n警告: {err}\n{bar}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_all_alias_forms() {
        for flag in ["-i", "-I", "--i", "--I", "-infile", "--infile"] {
            match parse_args(args(&[flag, "in.txt"])) {
                CliCommand::Run(parsed) => assert_eq!(parsed.input, Some(PathBuf::from("in.txt"))),
                other => panic!("{flag}: {other:?}"),
            }
        }
        match parse_args(args(&["--ofile", "out.csv", "-C", "s.toml"])) {
            CliCommand::Run(parsed) => {
                assert_eq!(parsed.output, Some(PathBuf::from("out.csv")));
                assert_eq!(parsed.settings, Some(PathBuf::from("s.toml")));
                assert_eq!(parsed.input, None);
            }
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn test_help_wins_anywhere() {
        assert!(matches!(parse_args(args(&["-i", "a.txt", "--H"])), CliCommand::Help));
        assert!(matches!(parse_args(args(&["-help"])), CliCommand::Help));
    }

    #[test]
    fn test_flag_without_value_is_malformed() {
        match parse_args(args(&["-i", "a.txt", "-o"])) {
            CliCommand::Malformed(ArgsError::MissingValue { flag }) => assert_eq!(flag, "-o"),
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn test_unknown_arguments_are_ignored() {
        match parse_args(args(&["--verbose", "-i", "x.txt"])) {
            CliCommand::Run(parsed) => assert_eq!(parsed.input, Some(PathBuf::from("x.txt"))),
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn test_help_text_lists_flag_groups() {
        let text = help_text("https://example.org");
        assert!(text.contains("--infile"));
        assert!(text.contains("--ofile"));
        assert!(text.contains("--help"));
        assert!(text.contains("https://example.org"));
    }
}
