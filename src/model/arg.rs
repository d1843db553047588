use clap::Parser;

/// PublicAI 定时心跳客户端
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<String>,

    /// 代理列表文件路径（覆盖配置中的 proxyFile）
    #[arg(long)]
    pub proxies: Option<String>,
}
