//! Reasoning tasks issued by the stages

pub const EXTRACTION_TASK: &str =
    "Extract key financial metrics and identify any anomalies or risks";

pub const ANALYSIS_TASK: &str = "Provide a profitability, liquidity and leverage analysis. \
Highlight key strengths and weaknesses with numerical explanations";

pub const MARKET_TASK: &str = "Analyze competitive positioning, market opportunities and \
threats, sector trend impact and investment implications";

pub const RISK_TASK: &str =
    "Assess the overall risk profile and explain the main drivers of the risk score";

pub const QUALITY_TASK: &str = "Briefly assess the quality of this analysis";

pub const SUMMARY_TASK: &str =
    "Create a concise executive summary (2-3 sentences) highlighting key findings";
