//! Contract wrappers for the token and hook contracts that the runner talks to.
//!
//! The hook's interface is owned by the contracts repository, so only the
//! functions and errors that the tooling uses are declared here.

pub mod wrappers {
    use ethers::contract::abigen;

    abigen!(
        IERC20,
        r#"[
            function symbol() external view returns (string)
            function balanceOf(address account) external view returns (uint256)
            function allowance(address owner, address spender) external view returns (uint256)
            function approve(address spender, uint256 value) external returns (bool)
            error ERC20InsufficientBalance(address sender, uint256 balance, uint256 needed)
            error ERC20InvalidSender(address sender)
            error ERC20InvalidReceiver(address receiver)
            error ERC20InsufficientAllowance(address spender, uint256 allowance, uint256 needed)
            error ERC20InvalidApprover(address approver)
            error ERC20InvalidSpender(address spender)
        ]"#,
        derives(serde::Deserialize, serde::Serialize)
    );

    abigen!(
        CorkHook,
        r#"[
            struct PoolKey { address currency0; address currency1; uint24 fee; int24 tickSpacing; address hooks; }
            function getPoolManager() external view returns (address)
            function getForwarder() external view returns (address)
            function getPoolKey(address ra, address ct) external view returns (PoolKey)
            function getLiquidityToken(address ra, address ct) external view returns (address)
            function getFee(address ra, address ct) external view returns (uint256 baseFeePercentage, uint256 actualFeePercentage)
            function getAmountIn(address ra, address ct, bool raForCt, uint256 amountOut) external view returns (uint256 amountIn)
            function getAmountOut(address ra, address ct, bool raForCt, uint256 amountIn) external view returns (uint256 amountOut)
            function addLiquidity(address ra, address ct, uint256 raAmount, uint256 ctAmount, uint256 amountRamin, uint256 amountCtmin, uint256 deadline) external returns (uint256 amountRa, uint256 amountCt, uint256 mintedLp)
            error PoolNotInitialized()
            error CurrenciesOutOfOrderOrEqual(address currency0, address currency1)
            error ManagerLocked()
            error InvalidCaller()
            error ProtocolFeeCannotBeFetched()
            error ProtocolFeeTooLarge(uint24 fee)
            error ContractUnlocked()
            error SwapAmountCannotBeZero()
            error NonzeroNativeValue()
            error MustClearExactPositiveDelta()
            error TickSpacingTooLarge(int24 tickSpacing)
            error TickSpacingTooSmall(int24 tickSpacing)
            error SafeCastOverflow()
            error Expired()
        ]"#,
        derives(serde::Deserialize, serde::Serialize)
    );
}
