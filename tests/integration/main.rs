mod mock_host;
mod session_flow;
